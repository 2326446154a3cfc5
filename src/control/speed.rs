//! # Speed Limiter
//!
//! Scales a signed 16-bit stick reading into a horizontal motor speed bounded
//! by the limit of the active [`HandlingMode`].
//!
//! The formula is `trunc(raw * (limit / 32768) * ratio)`. With
//! `limit <= 32768` and `|ratio| <= 1` (both guaranteed by
//! [`Config::validate`](crate::config::Config::validate)) the result always
//! fits in an `i16`.

use super::mode::HandlingMode;
use crate::config::{SpeedConfig, AXIS_FULL_SCALE};

/// Per-mode speed limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedLimiter {
    normal: u16,
    high: u16,
    slow: u16,
}

impl Default for SpeedLimiter {
    fn default() -> Self {
        Self::from(&SpeedConfig::default())
    }
}

impl From<&SpeedConfig> for SpeedLimiter {
    fn from(config: &SpeedConfig) -> Self {
        Self {
            normal: config.normal_limit,
            high: config.high_limit,
            slow: config.slow_limit,
        }
    }
}

impl SpeedLimiter {
    #[must_use]
    pub fn new(normal: u16, high: u16, slow: u16) -> Self {
        Self { normal, high, slow }
    }

    /// Limit for a moving mode, `None` for [`HandlingMode::Stop`].
    #[must_use]
    pub fn limit(&self, mode: HandlingMode) -> Option<u16> {
        match mode {
            HandlingMode::Normal => Some(self.normal),
            HandlingMode::High => Some(self.high),
            HandlingMode::Slow => Some(self.slow),
            HandlingMode::Stop => None,
        }
    }

    /// Computes the bounded speed for one axis.
    ///
    /// A zero reading always yields zero, as does [`HandlingMode::Stop`].
    /// `ratio` is the per-axis multiplier from configuration (negative to
    /// invert the axis).
    ///
    /// # Examples
    ///
    /// ```
    /// use rov_bridge::control::mode::HandlingMode;
    /// use rov_bridge::control::speed::SpeedLimiter;
    ///
    /// let limiter = SpeedLimiter::default();
    /// assert_eq!(limiter.compute(16384, HandlingMode::Normal, -1.0), -600);
    /// assert_eq!(limiter.compute(16384, HandlingMode::Stop, -1.0), 0);
    /// ```
    #[must_use]
    pub fn compute(&self, raw: i16, mode: HandlingMode, ratio: f32) -> i16 {
        if raw == 0 {
            return 0;
        }

        let Some(limit) = self.limit(mode) else {
            return 0;
        };

        let speed = f32::from(raw) * (f32::from(limit) / AXIS_FULL_SCALE) * ratio;

        // `as` truncates toward zero
        speed as i16
    }
}
