//! # Controller Input Abstraction
//!
//! The control loop only sees the controller through [`InputSource`]: level
//! queries (is a button held), edge queries (was it pushed this tick), signed
//! stick readings and a liveness check.

use super::mapper::PadState;
use crate::error::Result;

/// Digital inputs of the DualSense, d-pad directions included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Cross,
    Circle,
    Square,
    Triangle,
    L1,
    R1,
    L2,
    R2,
    Share,
    Options,
    Ps,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

/// Analog stick axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Per-tick state of a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Not held.
    Idle,
    /// Went down this tick.
    Pushed,
    /// Held since an earlier tick.
    Held,
}

impl ButtonState {
    /// Classifies a button from its level on the previous and current tick.
    #[must_use]
    pub fn from_levels(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (_, false) => ButtonState::Idle,
            (false, true) => ButtonState::Pushed,
            (true, true) => ButtonState::Held,
        }
    }

    /// Down this tick, whether newly or not.
    #[must_use]
    pub fn is_pressed(self) -> bool {
        self != ButtonState::Idle
    }

    /// Rising edge this tick.
    #[must_use]
    pub fn is_pushed(self) -> bool {
        self == ButtonState::Pushed
    }
}

/// A controller polled once per tick.
#[cfg_attr(test, mockall::automock)]
pub trait InputSource {
    /// Pulls all pending input and starts a new tick.
    fn update(&mut self) -> Result<()>;

    /// `false` once the controller has gone away.
    fn is_connected(&self) -> bool;

    /// Button held this tick.
    fn pressed(&self, button: Button) -> bool;

    /// Button went down this tick.
    fn pushed(&self, button: Button) -> bool;

    /// Signed stick reading, 0 at rest.
    fn axis(&self, axis: Axis) -> i16;
}

/// Controller state for the current and previous tick.
///
/// Edge queries compare the two; [`InputSnapshot::advance`] rolls the window.
/// Sources that see individual events can also hand over the pushes they
/// latched with [`InputSnapshot::advance_latched`], which then count as
/// pushed (and so pressed) for this tick even if the button is up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    previous: PadState,
    current: PadState,
    latched: Vec<Button>,
}

impl InputSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new tick with `state` as the current state.
    pub fn advance(&mut self, state: PadState) {
        self.advance_latched(state, Vec::new());
    }

    /// Starts a new tick, also marking `pushes` as pushed this tick.
    pub fn advance_latched(&mut self, state: PadState, pushes: Vec<Button>) {
        self.previous = std::mem::replace(&mut self.current, state);
        self.latched = pushes;
    }

    #[must_use]
    pub fn current(&self) -> &PadState {
        &self.current
    }

    #[must_use]
    pub fn button_state(&self, button: Button) -> ButtonState {
        if self.latched.contains(&button) {
            return ButtonState::Pushed;
        }
        ButtonState::from_levels(self.previous.button(button), self.current.button(button))
    }

    #[must_use]
    pub fn pressed(&self, button: Button) -> bool {
        self.button_state(button).is_pressed()
    }

    #[must_use]
    pub fn pushed(&self, button: Button) -> bool {
        self.button_state(button).is_pushed()
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> i16 {
        self.current.axis(axis)
    }
}
