//! # Configuration Module
//!
//! Tuning constants for the bridge. Every value has a compiled-in default, so
//! the bridge runs without any file; a TOML file may override any subset.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{BridgeError, Result};

/// Highest servo command representable in the 7 low bits of `arm_state`.
pub const SERVO_COMMAND_MAX: u8 = 0x7F;

/// Full-scale magnitude of a signed 16-bit axis reading.
pub const AXIS_FULL_SCALE: f32 = 32768.0;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub speed: SpeedConfig,
    #[serde(default)]
    pub depth: DepthConfig,
    #[serde(default)]
    pub servo: ServoConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// UDP link configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LinkConfig {
    /// Vehicle address the command packets are sent to.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Local address the socket binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ControllerConfig {
    /// evdev node to open. Empty means auto-detect.
    #[serde(default)]
    pub device_path: String,
}

/// Horizontal speed limits per handling mode and per-axis ratios.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SpeedConfig {
    #[serde(default = "default_normal_limit")]
    pub normal_limit: u16,

    #[serde(default = "default_high_limit")]
    pub high_limit: u16,

    #[serde(default = "default_slow_limit")]
    pub slow_limit: u16,

    #[serde(default = "default_axis_ratio")]
    pub x_ratio: f32,

    #[serde(default = "default_axis_ratio")]
    pub y_ratio: f32,
}

/// Vertical (z) speed constants.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DepthConfig {
    #[serde(default = "default_up_speed")]
    pub up_speed: i16,

    #[serde(default = "default_down_speed")]
    pub down_speed: i16,

    /// Sent when neither up nor down is held.
    #[serde(default = "default_brake_speed")]
    pub brake_speed: i16,
}

/// Arm servo bounds and step.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServoConfig {
    #[serde(default = "default_servo_min")]
    pub min: f32,

    #[serde(default = "default_servo_max")]
    pub max: f32,

    #[serde(default = "default_servo_initial")]
    pub initial: f32,

    /// Position change per tick while a servo button is held.
    #[serde(default = "default_servo_step")]
    pub step: f32,
}

/// Control loop pacing.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "default_tick_interval_us")]
    pub tick_interval_us: u64,

    #[serde(default = "default_status_interval_ticks")]
    pub status_interval_ticks: u64,
}

// Default value functions
fn default_destination() -> String { "192.168.0.111:11111".to_string() }
fn default_bind_addr() -> String { "0.0.0.0:0".to_string() }

fn default_normal_limit() -> u16 { 1200 }
fn default_high_limit() -> u16 { 1500 }
fn default_slow_limit() -> u16 { 850 }
fn default_axis_ratio() -> f32 { -1.0 }

fn default_up_speed() -> i16 { -1300 }
fn default_down_speed() -> i16 { 350 }
fn default_brake_speed() -> i16 { -50 }

fn default_servo_min() -> f32 { 0.0 }
fn default_servo_max() -> f32 { SERVO_COMMAND_MAX as f32 }
fn default_servo_initial() -> f32 { 75.0 }
fn default_servo_step() -> f32 { 0.15 }

fn default_tick_interval_us() -> u64 { 2500 }
fn default_status_interval_ticks() -> u64 { 1000 }

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            normal_limit: default_normal_limit(),
            high_limit: default_high_limit(),
            slow_limit: default_slow_limit(),
            x_ratio: default_axis_ratio(),
            y_ratio: default_axis_ratio(),
        }
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            up_speed: default_up_speed(),
            down_speed: default_down_speed(),
            brake_speed: default_brake_speed(),
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min: default_servo_min(),
            max: default_servo_max(),
            initial: default_servo_initial(),
            step: default_servo_step(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: default_tick_interval_us(),
            status_interval_ticks: default_status_interval_ticks(),
        }
    }
}

impl LinkConfig {
    /// Parsed vehicle address.
    pub fn destination_addr(&self) -> Result<SocketAddr> {
        parse_addr("destination", &self.destination)
    }

    /// Parsed local bind address.
    pub fn bind_socket_addr(&self) -> Result<SocketAddr> {
        parse_addr("bind_addr", &self.bind_addr)
    }
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr> {
    value.parse().map_err(|e| {
        invalid(format!("{} '{}' is not a socket address: {}", field, value, e))
    })
}

fn invalid(msg: impl std::fmt::Display) -> BridgeError {
    BridgeError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys fall back to the compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rov_bridge::config::Config;
    ///
    /// let config = Config::load("rov-bridge.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// The speed limiter and packet encoder rely on these bounds instead of
    /// checking at run time.
    pub fn validate(&self) -> Result<()> {
        self.link.destination_addr()?;
        self.link.bind_socket_addr()?;

        for (name, limit) in [
            ("normal_limit", self.speed.normal_limit),
            ("high_limit", self.speed.high_limit),
            ("slow_limit", self.speed.slow_limit),
        ] {
            if limit == 0 || f32::from(limit) > AXIS_FULL_SCALE {
                return Err(invalid(format!("{} must be between 1 and 32768", name)));
            }
        }

        for (name, ratio) in [("x_ratio", self.speed.x_ratio), ("y_ratio", self.speed.y_ratio)] {
            if !(-1.0..=1.0).contains(&ratio) {
                return Err(invalid(format!("{} must be between -1.0 and 1.0", name)));
            }
        }

        let servo = &self.servo;

        // NaN compares false against every bound below
        for (name, value) in [
            ("min", servo.min),
            ("max", servo.max),
            ("initial", servo.initial),
            ("step", servo.step),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("servo {} must be a finite number", name)));
            }
        }

        if servo.min < 0.0 || servo.min >= servo.max {
            return Err(invalid("servo min must be non-negative and less than max"));
        }

        // Anything above 127 would spill into the rotate bit of arm_state.
        if servo.max > f32::from(SERVO_COMMAND_MAX) {
            return Err(invalid(format!(
                "servo max {} exceeds the 7-bit servo command range (0-{})",
                servo.max, SERVO_COMMAND_MAX
            )));
        }

        if servo.initial < servo.min || servo.initial > servo.max {
            return Err(invalid("servo initial must be within min..=max"));
        }

        if servo.step <= 0.0 || servo.step >= servo.max - servo.min {
            return Err(invalid("servo step must be positive and smaller than the servo range"));
        }

        if self.timing.tick_interval_us < 100 || self.timing.tick_interval_us > 1_000_000 {
            return Err(invalid("tick_interval_us must be between 100 and 1000000"));
        }

        if self.timing.status_interval_ticks == 0 {
            return Err(invalid("status_interval_ticks must be greater than 0"));
        }

        Ok(())
    }
}
