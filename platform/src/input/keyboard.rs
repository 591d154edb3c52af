//! Keyboard input handling

use everyday_core::{GameButton, RawControllerState};
use winit::keyboard::KeyCode;

use super::InputManager;

/// Keys bound to each button; either key of a pair presses it
pub(crate) const KEY_BINDINGS: [(GameButton, [KeyCode; 2]); GameButton::COUNT] = [
    (GameButton::Up, [KeyCode::KeyW, KeyCode::ArrowUp]),
    (GameButton::Down, [KeyCode::KeyS, KeyCode::ArrowDown]),
    (GameButton::Left, [KeyCode::KeyA, KeyCode::ArrowLeft]),
    (GameButton::Right, [KeyCode::KeyD, KeyCode::ArrowRight]),
    (GameButton::LeftShoulder, [KeyCode::KeyQ, KeyCode::KeyQ]),
    (GameButton::RightShoulder, [KeyCode::KeyE, KeyCode::KeyE]),
    (GameButton::Start, [KeyCode::Enter, KeyCode::NumpadEnter]),
    (GameButton::Back, [KeyCode::Backspace, KeyCode::Backspace]),
];

impl InputManager {
    /// Read the keyboard as a digital controller
    pub(super) fn read_keyboard_input(&self) -> RawControllerState {
        let is_pressed =
            |key: KeyCode| -> bool { self.keyboard_state.get(&key).copied().unwrap_or(false) };

        let mut state = RawControllerState::default();
        for (button, keys) in KEY_BINDINGS {
            state.set_button(button, keys.into_iter().any(|key| is_pressed(key)));
        }
        state
    }
}
