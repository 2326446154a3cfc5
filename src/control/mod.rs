//! # Control Module
//!
//! Derives the vehicle command packet from one tick of controller input.
//!
//! This module handles:
//! - Handling mode selection from the trigger buttons
//! - Mode-dependent horizontal speed limiting
//! - Arm servo position accumulation
//! - Vertical speed selection and packet encoding
//!
//! The only state carried between ticks lives in [`CommandDeriver`].

pub mod mode;
pub mod packet;
pub mod servo;
pub mod speed;

use std::fmt;

use crate::config::{Config, DepthConfig};
use mode::{select_mode, HandlingMode, ModeInputs};
use packet::{encode, select_z_speed, CommandPacket};
use servo::ServoAccumulator;
use speed::SpeedLimiter;

/// Controller input for one tick, already resolved to control roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlInputs {
    /// Held: force [`HandlingMode::Stop`].
    pub stop: bool,
    /// Held: [`HandlingMode::Slow`].
    pub brake: bool,
    /// Held: [`HandlingMode::High`].
    pub accelerate: bool,
    /// Held: ascend.
    pub up: bool,
    /// Held: descend.
    pub down: bool,
    /// Held: move the arm servo up.
    pub servo_increase: bool,
    /// Held: move the arm servo down.
    pub servo_decrease: bool,
    /// Rising edge: flip the rotate flag.
    pub toggle_rotate: bool,
    /// Horizontal stick X reading.
    pub x: i16,
    /// Horizontal stick Y reading.
    pub y: i16,
}

impl ControlInputs {
    fn mode_inputs(&self) -> ModeInputs {
        ModeInputs {
            stop: self.stop,
            brake: self.brake,
            accelerate: self.accelerate,
        }
    }
}

/// Result of one tick: the selected mode and the packet to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub mode: HandlingMode,
    pub packet: CommandPacket,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ mode: {} ] x: {} y: {} z: {} arm: {} rotate: {}",
            self.mode,
            self.packet.x_speed,
            self.packet.y_speed,
            self.packet.z_speed,
            self.packet.servo(),
            u8::from(self.packet.rotate()),
        )
    }
}

/// Turns per-tick inputs into command packets.
///
/// Owns the servo position and rotate flag, the only values carried from one
/// tick to the next.
///
/// # Examples
///
/// ```
/// use rov_bridge::config::Config;
/// use rov_bridge::control::{CommandDeriver, ControlInputs};
///
/// let mut deriver = CommandDeriver::new(&Config::default());
/// let report = deriver.tick(&ControlInputs { x: 16384, ..Default::default() });
///
/// assert_eq!(report.packet.x_speed, -600);
/// assert_eq!(report.packet.z_speed, -50);
/// assert_eq!(report.to_string(), "[ mode: normal ] x: -600 y: 0 z: -50 arm: 75 rotate: 0");
/// ```
#[derive(Debug, Clone)]
pub struct CommandDeriver {
    limiter: SpeedLimiter,
    x_ratio: f32,
    y_ratio: f32,
    depth: DepthConfig,
    servo: ServoAccumulator,
    rotate: bool,
}

impl CommandDeriver {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            limiter: SpeedLimiter::from(&config.speed),
            x_ratio: config.speed.x_ratio,
            y_ratio: config.speed.y_ratio,
            depth: config.depth.clone(),
            servo: ServoAccumulator::from(&config.servo),
            rotate: false,
        }
    }

    /// Current rotate flag.
    #[must_use]
    pub fn rotate(&self) -> bool {
        self.rotate
    }

    /// Current floating servo position.
    #[must_use]
    pub fn servo_position(&self) -> f32 {
        self.servo.position()
    }

    /// Runs one tick.
    pub fn tick(&mut self, inputs: &ControlInputs) -> TickReport {
        let mode = select_mode(&inputs.mode_inputs());

        let z_speed = select_z_speed(inputs.up, inputs.down, &self.depth);

        self.servo.update(inputs.servo_increase, inputs.servo_decrease);

        if inputs.toggle_rotate {
            self.rotate = !self.rotate;
        }

        let packet = encode(
            self.limiter.compute(inputs.x, mode, self.x_ratio),
            self.limiter.compute(inputs.y, mode, self.y_ratio),
            z_speed,
            self.rotate,
            self.servo.command(),
        );

        TickReport { mode, packet }
    }
}
