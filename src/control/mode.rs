//! # Handling Mode Selection
//!
//! Picks the speed-limiting regime for the current tick from the trigger
//! buttons. Recomputed from scratch every tick; there is no hysteresis.

use std::fmt;

/// Discrete handling regime active for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlingMode {
    #[default]
    Normal,
    Slow,
    High,
    Stop,
}

impl HandlingMode {
    /// Lowercase name used in the diagnostic line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HandlingMode::Normal => "normal",
            HandlingMode::Slow => "slow",
            HandlingMode::High => "high",
            HandlingMode::Stop => "stop",
        }
    }
}

impl fmt::Display for HandlingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of the mode trigger inputs for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeInputs {
    pub stop: bool,
    pub brake: bool,
    pub accelerate: bool,
}

/// Selects exactly one mode with priority Stop > Slow > High > Normal.
///
/// # Examples
///
/// ```
/// use rov_bridge::control::mode::{select_mode, HandlingMode, ModeInputs};
///
/// let inputs = ModeInputs { stop: false, brake: true, accelerate: true };
/// assert_eq!(select_mode(&inputs), HandlingMode::Slow);
/// ```
#[must_use]
pub fn select_mode(inputs: &ModeInputs) -> HandlingMode {
    if inputs.stop {
        HandlingMode::Stop
    } else if inputs.brake {
        HandlingMode::Slow
    } else if inputs.accelerate {
        HandlingMode::High
    } else {
        HandlingMode::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(stop: bool, brake: bool, accelerate: bool) -> ModeInputs {
        ModeInputs { stop, brake, accelerate }
    }

    #[test]
    fn test_no_input_is_normal() {
        assert_eq!(select_mode(&ModeInputs::default()), HandlingMode::Normal);
    }

    #[test]
    fn test_single_inputs() {
        assert_eq!(select_mode(&inputs(true, false, false)), HandlingMode::Stop);
        assert_eq!(select_mode(&inputs(false, true, false)), HandlingMode::Slow);
        assert_eq!(select_mode(&inputs(false, false, true)), HandlingMode::High);
    }

    #[test]
    fn test_stop_wins_over_everything() {
        assert_eq!(select_mode(&inputs(true, true, true)), HandlingMode::Stop);
        assert_eq!(select_mode(&inputs(true, false, true)), HandlingMode::Stop);
        assert_eq!(select_mode(&inputs(true, true, false)), HandlingMode::Stop);
    }

    #[test]
    fn test_brake_wins_over_accelerate() {
        assert_eq!(select_mode(&inputs(false, true, true)), HandlingMode::Slow);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(HandlingMode::Normal.name(), "normal");
        assert_eq!(HandlingMode::Slow.name(), "slow");
        assert_eq!(HandlingMode::High.name(), "high");
        assert_eq!(HandlingMode::Stop.to_string(), "stop");
    }
}
