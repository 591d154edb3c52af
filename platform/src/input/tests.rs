//! Tests for InputManager

use everyday_core::config::InputConfig;
use everyday_core::{GameButton, InputBuffers, RawControllerState};
use winit::keyboard::KeyCode;

use super::keyboard::KEY_BINDINGS;
use super::{InputManager, axis_to_raw};

fn keyboard_manager() -> InputManager {
    InputManager::without_gamepads(InputConfig::default())
}

fn slot0(manager: &InputManager) -> RawControllerState {
    manager.raw_input().controllers[0].expect("keyboard drives slot 0")
}

// ============================================================================
// Keyboard Tests
// ============================================================================

#[test]
fn test_keyboard_drives_slot_zero_as_digital() {
    let mut manager = keyboard_manager();
    manager.update();

    let state = slot0(&manager);
    assert!(!state.analog);
    assert_eq!(state.buttons, [false; GameButton::COUNT]);
    assert_eq!((state.stick_x, state.stick_y), (0, 0));
    assert!(manager.raw_input().controllers[1..].iter().all(Option::is_none));
}

#[test]
fn test_wasd_and_arrows_map_to_directions() {
    let mut manager = keyboard_manager();
    manager.update_keyboard(KeyCode::KeyW, true);
    manager.update_keyboard(KeyCode::ArrowLeft, true);
    manager.update();

    let state = slot0(&manager);
    assert!(state.buttons[GameButton::Up.index()]);
    assert!(state.buttons[GameButton::Left.index()]);
    assert!(!state.buttons[GameButton::Down.index()]);
    assert!(!state.buttons[GameButton::Right.index()]);
}

#[test]
fn test_shoulder_start_back_keys() {
    let mut manager = keyboard_manager();
    for key in [KeyCode::KeyQ, KeyCode::KeyE, KeyCode::Enter, KeyCode::Backspace] {
        manager.update_keyboard(key, true);
    }
    manager.update();

    let state = slot0(&manager);
    assert!(state.buttons[GameButton::LeftShoulder.index()]);
    assert!(state.buttons[GameButton::RightShoulder.index()]);
    assert!(state.buttons[GameButton::Start.index()]);
    assert!(state.buttons[GameButton::Back.index()]);
}

#[test]
fn test_key_release_clears_button() {
    let mut manager = keyboard_manager();
    manager.update_keyboard(KeyCode::KeyS, true);
    manager.update();
    assert!(slot0(&manager).buttons[GameButton::Down.index()]);

    manager.update_keyboard(KeyCode::KeyS, false);
    manager.update();
    assert!(!slot0(&manager).buttons[GameButton::Down.index()]);
}

#[test]
fn test_every_button_has_a_binding() {
    let bound: Vec<GameButton> = KEY_BINDINGS.iter().map(|(button, _)| *button).collect();
    assert_eq!(bound, GameButton::ALL.to_vec());
}

#[test]
fn test_keyboard_presses_count_half_transitions() {
    let mut manager = keyboard_manager();
    let mut buffers = InputBuffers::new();

    for pressed in [true, true, false] {
        manager.update_keyboard(KeyCode::KeyD, pressed);
        manager.update();
        buffers.capture(manager.raw_input());
        buffers.swap();
    }

    let right = *buffers.old_input().controllers[0].button(GameButton::Right);
    assert_eq!(right.half_transition_count, 2);
    assert!(!right.ended_down);
}

// ============================================================================
// Analog Conversion Tests
// ============================================================================

#[test]
fn test_axis_to_raw_range() {
    assert_eq!(axis_to_raw(0.0), 0);
    assert_eq!(axis_to_raw(1.0), 32767);
    assert_eq!(axis_to_raw(-1.0), -32767);
    assert_eq!(axis_to_raw(2.0), 32767);
    assert_eq!(axis_to_raw(-2.0), -32768);
}

#[test]
fn test_stick_deadzone() {
    let manager = keyboard_manager();
    assert_eq!(manager.apply_stick_deadzone(0.1), 0.0);
    assert_eq!(manager.apply_stick_deadzone(-0.1), 0.0);
    assert_eq!(manager.apply_stick_deadzone(1.0), 1.0);
    assert_eq!(manager.apply_stick_deadzone(-1.0), -1.0);

    // Halfway between the deadzone edge and full deflection
    let mid = manager.apply_stick_deadzone(0.575);
    assert!((mid - 0.5).abs() < 1e-5);
}
