//! Gamepad input handling

use everyday_core::{GameButton, RawControllerState};
use gilrs::{Axis, Button};

use super::{InputManager, axis_to_raw};

impl InputManager {
    /// Read gamepad input as an analog controller
    pub(super) fn read_gamepad_input(&self, gamepad: &gilrs::Gamepad) -> RawControllerState {
        let btn = |button: Button| -> bool { gamepad.is_pressed(button) };

        // Read axes with deadzone
        let axis = |axis: Axis| -> f32 {
            let value = gamepad.value(axis);
            self.apply_stick_deadzone(value)
        };

        // gilrs reports up as positive; the raw convention grows downward
        let mut state = RawControllerState {
            analog: true,
            stick_x: axis_to_raw(axis(Axis::LeftStickX)),
            stick_y: axis_to_raw(-axis(Axis::LeftStickY)),
            ..Default::default()
        };
        state.set_button(GameButton::Up, btn(Button::DPadUp));
        state.set_button(GameButton::Down, btn(Button::DPadDown));
        state.set_button(GameButton::Left, btn(Button::DPadLeft));
        state.set_button(GameButton::Right, btn(Button::DPadRight));
        state.set_button(GameButton::LeftShoulder, btn(Button::LeftTrigger));
        state.set_button(GameButton::RightShoulder, btn(Button::RightTrigger));
        state.set_button(GameButton::Start, btn(Button::Start));
        state.set_button(GameButton::Back, btn(Button::Select));
        state
    }
}
