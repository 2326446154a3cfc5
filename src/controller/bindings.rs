//! # Control Bindings
//!
//! Assigns controller buttons and sticks to control roles.
//!
//! ## Default Layout
//!
//! | Input | Role | Query |
//! |-------|------|-------|
//! | Cross (×) | Stop mode | held |
//! | L2 | Slow mode (brake) | held |
//! | R2 | High mode (accelerate) | held |
//! | D-Pad Up | Ascend | held |
//! | D-Pad Down | Descend | held |
//! | R1 | Servo up | held |
//! | L1 | Servo down | held |
//! | Circle (○) | Toggle rotate | pushed |
//! | Options | Start / exit | pushed |
//! | Left Stick X | X speed | axis |
//! | Left Stick Y | Y speed | axis |

use super::input::{Axis, Button, InputSource};
use crate::control::ControlInputs;

/// Which input drives which control role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBindings {
    pub stop: Button,
    pub brake: Button,
    pub accelerate: Button,
    pub up: Button,
    pub down: Button,
    pub servo_increase: Button,
    pub servo_decrease: Button,
    pub toggle_rotate: Button,
    /// Pushed once to start transmitting and again to exit.
    pub start_exit: Button,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            stop: Button::Cross,
            brake: Button::L2,
            accelerate: Button::R2,
            up: Button::DpadUp,
            down: Button::DpadDown,
            servo_increase: Button::R1,
            servo_decrease: Button::L1,
            toggle_rotate: Button::Circle,
            start_exit: Button::Options,
            x_axis: Axis::LeftStickX,
            y_axis: Axis::LeftStickY,
        }
    }
}

impl ControlBindings {
    /// Reads the current tick of `input` into control roles.
    pub fn read_inputs<I: InputSource + ?Sized>(&self, input: &I) -> ControlInputs {
        ControlInputs {
            stop: input.pressed(self.stop),
            brake: input.pressed(self.brake),
            accelerate: input.pressed(self.accelerate),
            up: input.pressed(self.up),
            down: input.pressed(self.down),
            servo_increase: input.pressed(self.servo_increase),
            servo_decrease: input.pressed(self.servo_decrease),
            toggle_rotate: input.pushed(self.toggle_rotate),
            x: input.axis(self.x_axis),
            y: input.axis(self.y_axis),
        }
    }

    /// Whether the start/exit button went down this tick.
    pub fn start_exit_pushed<I: InputSource + ?Sized>(&self, input: &I) -> bool {
        input.pushed(self.start_exit)
    }
}
