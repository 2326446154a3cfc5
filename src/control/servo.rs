//! # Servo Accumulator
//!
//! Integrates a small per-tick step into a floating arm servo position.
//!
//! Bounds are enforced by rejection: a step that would leave
//! `[min, max]` is discarded and the position stays where it was. Pushing
//! against a limit therefore freezes at the last in-range value instead of
//! snapping to the limit.

use crate::config::ServoConfig;

/// Applies `delta` to `position` unless the result leaves `[min, max]`.
///
/// A position that is already out of range is never corrected, only kept
/// from getting worse.
///
/// # Examples
///
/// ```
/// use rov_bridge::control::servo::advance;
///
/// assert_eq!(advance(75.0, 0.5, 0.0, 150.0), 75.5);
/// assert_eq!(advance(149.9, 0.15, 0.0, 150.0), 149.9);
/// ```
#[must_use]
pub fn advance(position: f32, delta: f32, min: f32, max: f32) -> f32 {
    let candidate = position + delta;

    if candidate > max || candidate < min {
        return position;
    }

    candidate
}

/// Servo position carried across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct ServoAccumulator {
    position: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl Default for ServoAccumulator {
    fn default() -> Self {
        Self::from(&ServoConfig::default())
    }
}

impl From<&ServoConfig> for ServoAccumulator {
    fn from(config: &ServoConfig) -> Self {
        Self {
            position: config.initial,
            min: config.min,
            max: config.max,
            step: config.step,
        }
    }
}

impl ServoAccumulator {
    /// Current floating position.
    #[must_use]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Step for this tick: `+step` when increasing, `-step` when decreasing,
    /// zero otherwise. Increase wins if both are held.
    #[must_use]
    pub fn delta(&self, increase: bool, decrease: bool) -> f32 {
        if increase {
            self.step
        } else if decrease {
            -self.step
        } else {
            0.0
        }
    }

    /// Advances by one tick and returns the new position.
    pub fn update(&mut self, increase: bool, decrease: bool) -> f32 {
        let delta = self.delta(increase, decrease);
        self.position = advance(self.position, delta, self.min, self.max);
        self.position
    }

    /// Position truncated to the byte sent on the wire.
    #[must_use]
    pub fn command(&self) -> u8 {
        self.position as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: f32 = 0.0;
    const MAX: f32 = 150.0;

    fn accumulator(initial: f32) -> ServoAccumulator {
        ServoAccumulator::from(&ServoConfig {
            min: 0.0,
            max: 127.0,
            initial,
            step: 0.15,
        })
    }

    #[test]
    fn test_zero_delta_keeps_position() {
        for position in [0.0, 0.15, 75.0, 149.9, 150.0] {
            assert_eq!(advance(position, 0.0, MIN, MAX), position);
        }
    }

    #[test]
    fn test_step_within_range() {
        let position = advance(75.0, 0.15, MIN, MAX);
        assert!((position - 75.15).abs() < 1e-4);
        assert_eq!(position as u8, 75);
    }

    #[test]
    fn test_step_past_max_is_rejected() {
        assert_eq!(advance(149.9, 0.15, MIN, MAX), 149.9);
        assert_eq!(advance(150.0, 0.15, MIN, MAX), 150.0);
    }

    #[test]
    fn test_step_past_min_is_rejected() {
        assert_eq!(advance(0.1, -0.15, MIN, MAX), 0.1);
        assert_eq!(advance(0.0, -0.15, MIN, MAX), 0.0);
    }

    #[test]
    fn test_rejection_not_clamping() {
        for position in [0.0f32, 10.0, 75.0, 140.0, 150.0] {
            for delta in [-200.0f32, -10.5, 10.5, 200.0] {
                let candidate = position + delta;
                if candidate > MAX || candidate < MIN {
                    assert_eq!(advance(position, delta, MIN, MAX), position);
                }
            }
        }
    }

    #[test]
    fn test_landing_exactly_on_bound_is_accepted() {
        assert_eq!(advance(149.5, 0.5, MIN, MAX), 150.0);
        assert_eq!(advance(0.5, -0.5, MIN, MAX), 0.0);
    }

    #[test]
    fn test_out_of_range_position_is_not_corrected() {
        assert_eq!(advance(160.0, 0.15, MIN, MAX), 160.0);
        assert_eq!(advance(160.0, -0.15, MIN, MAX), 160.0);
    }

    #[test]
    fn test_default_accumulator() {
        let servo = ServoAccumulator::default();
        assert_eq!(servo.position(), 75.0);
        assert_eq!(servo.command(), 75);
    }

    #[test]
    fn test_delta_priority() {
        let servo = accumulator(75.0);
        assert_eq!(servo.delta(true, false), 0.15);
        assert_eq!(servo.delta(false, true), -0.15);
        assert_eq!(servo.delta(true, true), 0.15);
        assert_eq!(servo.delta(false, false), 0.0);
    }

    #[test]
    fn test_update_accumulates_while_held() {
        let mut servo = accumulator(75.0);
        for _ in 0..10 {
            servo.update(true, false);
        }
        assert!((servo.position() - 76.5).abs() < 1e-3);
        assert_eq!(servo.command(), 76);

        for _ in 0..20 {
            servo.update(false, true);
        }
        assert!((servo.position() - 73.5).abs() < 1e-3);
        assert_eq!(servo.command(), 73);
    }

    #[test]
    fn test_update_saturates_at_upper_bound() {
        let mut servo = accumulator(126.0);
        for _ in 0..100 {
            servo.update(true, false);
        }
        assert!(servo.position() <= 127.0);
        assert!(servo.position() > 126.8);
        assert_eq!(servo.command(), 126);
    }

    #[test]
    fn test_update_saturates_at_lower_bound() {
        let mut servo = accumulator(1.0);
        for _ in 0..100 {
            servo.update(false, true);
        }
        assert!(servo.position() >= 0.0);
        assert!(servo.position() < 0.15);
        assert_eq!(servo.command(), 0);
    }

    #[test]
    fn test_command_truncates() {
        assert_eq!(accumulator(75.99).command(), 75);
        assert_eq!(accumulator(0.5).command(), 0);
        assert_eq!(accumulator(127.0).command(), 127);
    }
}
