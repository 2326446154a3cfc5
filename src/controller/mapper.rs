//! # Controller Event Mapper Module
//!
//! Parses raw evdev events from the PS5 DualSense controller into a
//! [`PadState`].
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range |
//! |------|------------|-------|
//! | Left Stick X | ABS_X | 0-255 |
//! | Left Stick Y | ABS_Y | 0-255 |
//! | Right Stick X | ABS_Z | 0-255 |
//! | Right Stick Y | ABS_RZ | 0-255 |
//! | D-Pad X | ABS_HAT0X | -1/0/1 |
//! | D-Pad Y | ABS_HAT0Y | -1/0/1 |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code |
//! |--------|------------|
//! | Cross (×) | BTN_SOUTH |
//! | Circle (○) | BTN_EAST |
//! | Square (□) | BTN_WEST |
//! | Triangle (△) | BTN_NORTH |
//! | L1 / R1 | BTN_TL / BTN_TR |
//! | L2 / R2 (click) | BTN_TL2 / BTN_TR2 |
//! | Share | BTN_SELECT |
//! | Options | BTN_START |
//! | PS | BTN_MODE |
//!
//! Stick values are kept raw; [`stick_to_axis_reading`] converts them to the
//! signed 16-bit readings the control loop works with.

use evdev::{AbsoluteAxisType, InputEvent, Key};

use super::input::{Axis, Button};

/// Raw axis value range from DualSense controller.
pub const AXIS_MIN: i32 = 0;
/// Raw axis value range from DualSense controller.
pub const AXIS_MAX: i32 = 255;
/// Raw axis center value.
pub const AXIS_CENTER: i32 = 128;

/// D-Pad axis values.
pub const DPAD_RELEASED: i32 = 0;
/// D-Pad pressed negative direction (left or up).
pub const DPAD_NEGATIVE: i32 = -1;
/// D-Pad pressed positive direction (right or down).
pub const DPAD_POSITIVE: i32 = 1;

/// Converts a raw 8-bit stick value into a signed 16-bit reading.
///
/// Center maps to exactly 0, the extremes to -32768 and 32512.
///
/// # Examples
///
/// ```
/// use rov_bridge::controller::mapper::stick_to_axis_reading;
///
/// assert_eq!(stick_to_axis_reading(128), 0);
/// assert_eq!(stick_to_axis_reading(0), -32768);
/// assert_eq!(stick_to_axis_reading(192), 16384);
/// ```
#[must_use]
pub fn stick_to_axis_reading(value: i32) -> i16 {
    let clamped = value.clamp(AXIS_MIN, AXIS_MAX);
    ((clamped - AXIS_CENTER) << 8) as i16
}

/// Complete state of the PS5 DualSense controller relevant to the bridge.
///
/// # Examples
///
/// ```
/// use rov_bridge::controller::mapper::PadState;
///
/// let state = PadState::default();
/// assert_eq!(state.left_stick_x, 128);  // Centered
/// assert!(!state.btn_l1);               // Not pressed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadState {
    // Analog sticks (0-255, 128 = center)
    /// Left stick X axis. 0 = full left, 255 = full right.
    pub left_stick_x: i32,
    /// Left stick Y axis. 0 = full up, 255 = full down.
    pub left_stick_y: i32,
    /// Right stick X axis.
    pub right_stick_x: i32,
    /// Right stick Y axis.
    pub right_stick_y: i32,

    // D-Pad (-1, 0, 1)
    /// D-Pad X axis. -1 = left, 0 = center, 1 = right.
    pub dpad_x: i32,
    /// D-Pad Y axis. -1 = up, 0 = center, 1 = down.
    pub dpad_y: i32,

    // Face buttons
    pub btn_cross: bool,
    pub btn_circle: bool,
    pub btn_square: bool,
    pub btn_triangle: bool,

    // Shoulder buttons
    pub btn_l1: bool,
    pub btn_r1: bool,
    /// L2 digital click.
    pub btn_l2: bool,
    /// R2 digital click.
    pub btn_r2: bool,

    // System buttons
    pub btn_share: bool,
    pub btn_options: bool,
    pub btn_ps: bool,
}

impl Default for PadState {
    /// All sticks centered, d-pad released, no buttons held.
    fn default() -> Self {
        Self {
            left_stick_x: AXIS_CENTER,
            left_stick_y: AXIS_CENTER,
            right_stick_x: AXIS_CENTER,
            right_stick_y: AXIS_CENTER,

            dpad_x: DPAD_RELEASED,
            dpad_y: DPAD_RELEASED,

            btn_cross: false,
            btn_circle: false,
            btn_square: false,
            btn_triangle: false,
            btn_l1: false,
            btn_r1: false,
            btn_l2: false,
            btn_r2: false,
            btn_share: false,
            btn_options: false,
            btn_ps: false,
        }
    }
}

impl PadState {
    /// Whether `button` is held in this state.
    #[must_use]
    pub fn button(&self, button: Button) -> bool {
        match button {
            Button::Cross => self.btn_cross,
            Button::Circle => self.btn_circle,
            Button::Square => self.btn_square,
            Button::Triangle => self.btn_triangle,
            Button::L1 => self.btn_l1,
            Button::R1 => self.btn_r1,
            Button::L2 => self.btn_l2,
            Button::R2 => self.btn_r2,
            Button::Share => self.btn_share,
            Button::Options => self.btn_options,
            Button::Ps => self.btn_ps,
            Button::DpadUp => self.dpad_y == DPAD_NEGATIVE,
            Button::DpadDown => self.dpad_y == DPAD_POSITIVE,
            Button::DpadLeft => self.dpad_x == DPAD_NEGATIVE,
            Button::DpadRight => self.dpad_x == DPAD_POSITIVE,
        }
    }

    /// Signed 16-bit reading of a stick axis.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> i16 {
        let raw = match axis {
            Axis::LeftStickX => self.left_stick_x,
            Axis::LeftStickY => self.left_stick_y,
            Axis::RightStickX => self.right_stick_x,
            Axis::RightStickY => self.right_stick_y,
        };
        stick_to_axis_reading(raw)
    }
}

/// Maps a button key code to its [`Button`].
fn key_button(key: Key) -> Option<Button> {
    match key {
        Key::BTN_SOUTH => Some(Button::Cross),
        Key::BTN_EAST => Some(Button::Circle),
        Key::BTN_WEST => Some(Button::Square),
        Key::BTN_NORTH => Some(Button::Triangle),
        Key::BTN_TL => Some(Button::L1),
        Key::BTN_TR => Some(Button::R1),
        Key::BTN_TL2 => Some(Button::L2),
        Key::BTN_TR2 => Some(Button::R2),
        Key::BTN_SELECT => Some(Button::Share),
        Key::BTN_START => Some(Button::Options),
        Key::BTN_MODE => Some(Button::Ps),
        _ => None,
    }
}

/// Parses raw evdev events and maintains controller state.
///
/// Besides the level state, the mapper latches every rising edge it sees
/// until [`EventMapper::take_pushes`] collects them, so a press and release
/// that both land between two collections is still reported as a push.
///
/// `EventMapper` is not thread-safe. Use from a single task/thread only.
#[derive(Debug, Default)]
pub struct EventMapper {
    state: PadState,
    pushes: Vec<Button>,
}

impl EventMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the current controller state.
    #[must_use]
    pub fn state(&self) -> &PadState {
        &self.state
    }

    /// Returns a clone of the current controller state.
    #[must_use]
    pub fn state_snapshot(&self) -> PadState {
        self.state.clone()
    }

    /// Rising edges seen since the last call, in arrival order, each button
    /// at most once.
    pub fn take_pushes(&mut self) -> Vec<Button> {
        std::mem::take(&mut self.pushes)
    }

    fn latch(&mut self, button: Button) {
        if !self.pushes.contains(&button) {
            self.pushes.push(button);
        }
    }

    fn latch_dpad(&mut self, previous: i32, value: i32, negative: Button, positive: Button) {
        if value == previous {
            return;
        }
        match value {
            DPAD_NEGATIVE => self.latch(negative),
            DPAD_POSITIVE => self.latch(positive),
            _ => {}
        }
    }

    /// Processes a single evdev input event and updates internal state.
    pub fn process_event(&mut self, event: &InputEvent) {
        match event.kind() {
            evdev::InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
            }
            evdev::InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
            }
            _ => {
                // Ignore sync events and other event types
            }
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        match axis {
            AbsoluteAxisType::ABS_X => self.state.left_stick_x = value,
            AbsoluteAxisType::ABS_Y => self.state.left_stick_y = value,

            // Right stick (DualSense uses ABS_Z and ABS_RZ)
            AbsoluteAxisType::ABS_Z => self.state.right_stick_x = value,
            AbsoluteAxisType::ABS_RZ => self.state.right_stick_y = value,

            AbsoluteAxisType::ABS_HAT0X => {
                self.latch_dpad(self.state.dpad_x, value, Button::DpadLeft, Button::DpadRight);
                self.state.dpad_x = value;
            }
            AbsoluteAxisType::ABS_HAT0Y => {
                self.latch_dpad(self.state.dpad_y, value, Button::DpadUp, Button::DpadDown);
                self.state.dpad_y = value;
            }

            _ => {
                // Ignore triggers, gyro, accelerometer
            }
        }
    }

    fn process_key_event(&mut self, key: Key, pressed: bool) {
        // Autorepeat (value 2) arrives as pressed-while-held: not an edge
        if let Some(button) = key_button(key) {
            if pressed && !self.state.button(button) {
                self.latch(button);
            }
        }

        match key {
            Key::BTN_SOUTH => self.state.btn_cross = pressed,
            Key::BTN_EAST => self.state.btn_circle = pressed,
            Key::BTN_WEST => self.state.btn_square = pressed,
            Key::BTN_NORTH => self.state.btn_triangle = pressed,

            Key::BTN_TL => self.state.btn_l1 = pressed,
            Key::BTN_TR => self.state.btn_r1 = pressed,
            Key::BTN_TL2 => self.state.btn_l2 = pressed,
            Key::BTN_TR2 => self.state.btn_r2 = pressed,

            Key::BTN_SELECT => self.state.btn_share = pressed,
            Key::BTN_START => self.state.btn_options = pressed,
            Key::BTN_MODE => self.state.btn_ps = pressed,

            _ => {}
        }
    }

    /// Resets all state to default (centered sticks, released buttons).
    pub fn reset(&mut self) {
        self.state = PadState::default();
        self.pushes.clear();
    }
}
