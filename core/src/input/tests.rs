//! Tests for the input double buffer

use proptest::prelude::*;

use super::*;

fn raw_with(buttons: &[(GameButton, bool)], stick_x: i16, stick_y: i16) -> RawInput {
    let mut controller = RawControllerState {
        analog: true,
        stick_x,
        stick_y,
        ..Default::default()
    };
    for &(button, is_down) in buttons {
        controller.set_button(button, is_down);
    }

    let mut raw = RawInput::default();
    raw.controllers[0] = Some(controller);
    raw
}

fn run_frame(buffers: &mut InputBuffers, raw: &RawInput) -> GameInput {
    let (new_input, _) = buffers.capture(raw);
    let snapshot = *new_input;
    buffers.swap();
    snapshot
}

// ============================================================================
// Stick Normalization Tests
// ============================================================================

#[test]
fn test_normalize_stick_extremes() {
    assert_eq!(normalize_stick_axis(-32768), 1.0);
    assert_eq!(normalize_stick_axis(32767), -1.0);
    assert_eq!(normalize_stick_axis(0), 0.0);
}

#[test]
fn test_normalize_stick_is_asymmetric() {
    // Same magnitude, different divisors on each side of zero
    assert_eq!(normalize_stick_axis(-16384), 16384.0 / 32768.0);
    assert_eq!(normalize_stick_axis(16384), -(16384.0 / 32767.0));
}

#[test]
fn test_normalize_stick_flips_sign() {
    assert!(normalize_stick_axis(100) < 0.0);
    assert!(normalize_stick_axis(-100) > 0.0);
}

// ============================================================================
// Button Processing Tests
// ============================================================================

#[test]
fn test_button_press_counts_one_transition() {
    let old = ButtonState::default();
    let new = ButtonState::process(&old, true);
    assert!(new.ended_down);
    assert_eq!(new.half_transition_count, 1);
}

#[test]
fn test_button_held_does_not_count() {
    let old = ButtonState {
        half_transition_count: 3,
        ended_down: true,
    };
    let new = ButtonState::process(&old, true);
    assert!(new.ended_down);
    assert_eq!(new.half_transition_count, 3);
}

#[test]
fn test_button_release_counts_one_transition() {
    let old = ButtonState {
        half_transition_count: 1,
        ended_down: true,
    };
    let new = ButtonState::process(&old, false);
    assert!(!new.ended_down);
    assert_eq!(new.half_transition_count, 2);
}

// ============================================================================
// Double Buffer Tests
// ============================================================================

#[test]
fn test_capture_writes_new_and_leaves_old_untouched() {
    let mut buffers = InputBuffers::new();
    let raw = raw_with(&[(GameButton::Down, true)], 0, 0);

    let (new_input, old_input) = buffers.capture(&raw);
    assert!(new_input.controllers[0].button(GameButton::Down).ended_down);
    assert_eq!(*old_input, GameInput::default());
}

#[test]
fn test_swap_alternates_new_index() {
    let mut buffers = InputBuffers::new();
    assert_eq!(buffers.new_index(), 0);
    buffers.swap();
    assert_eq!(buffers.new_index(), 1);
    buffers.swap();
    assert_eq!(buffers.new_index(), 0);
}

#[test]
fn test_old_input_is_previous_frame_after_swap() {
    let mut buffers = InputBuffers::new();
    let first = run_frame(&mut buffers, &raw_with(&[(GameButton::Up, true)], 0, 0));

    buffers.capture(&raw_with(&[], 0, 0));
    assert_eq!(*buffers.old_input(), first);
    assert!(!buffers.new_input().controllers[0].button(GameButton::Up).ended_down);
}

#[test]
fn test_write_targets_alternate_perfectly() {
    let mut buffers = InputBuffers::new();
    let mut writes = [0usize; 2];
    let frames: usize = 11;

    for _ in 0..frames {
        let target = buffers.new_index();
        buffers.capture(&RawInput::default());
        writes[target] += 1;
        buffers.swap();
    }

    assert_eq!(writes[0], frames.div_ceil(2));
    assert_eq!(writes[1], frames / 2);
}

#[test]
fn test_transitions_accumulate_across_swaps() {
    let mut buffers = InputBuffers::new();
    let presses = [true, false, true, true, false];
    let mut last = GameInput::default();
    for is_down in presses {
        last = run_frame(&mut buffers, &raw_with(&[(GameButton::Left, is_down)], 0, 0));
    }

    // up->down, down->up, up->down, (held), down->up
    assert_eq!(
        last.controllers[0].button(GameButton::Left).half_transition_count,
        4
    );
}

#[test]
fn test_stick_end_min_max() {
    let mut buffers = InputBuffers::new();
    let (new_input, _) = buffers.capture(&raw_with(&[], -32768, 32767));
    let stick = new_input.controllers[0].stick;

    assert_eq!(stick.end_x, 1.0);
    assert_eq!(stick.end_y, -1.0);
    assert_eq!(stick.min_x, stick.end_x);
    assert_eq!(stick.max_x, stick.end_x);
    assert_eq!(stick.min_y, stick.end_y);
    assert_eq!(stick.max_y, stick.end_y);
}

#[test]
fn test_stick_start_is_previous_end() {
    let mut buffers = InputBuffers::new();
    let first = run_frame(&mut buffers, &raw_with(&[], -32768, 0));
    let second = run_frame(&mut buffers, &raw_with(&[], 0, 0));

    assert_eq!(second.controllers[0].stick.start_x, first.controllers[0].stick.end_x);
    assert_eq!(second.controllers[0].stick.end_x, 0.0);
}

#[test]
fn test_connected_flags() {
    let mut buffers = InputBuffers::new();
    let mut raw = raw_with(&[], 0, 0);
    raw.controllers[2] = Some(RawControllerState::default());

    let (new_input, _) = buffers.capture(&raw);
    assert!(new_input.controllers[0].is_connected);
    assert!(new_input.controllers[0].is_analog);
    assert!(!new_input.controllers[1].is_connected);
    assert!(new_input.controllers[2].is_connected);
    assert!(!new_input.controllers[2].is_analog);
}

#[test]
fn test_disconnect_resets_slot_to_neutral() {
    let mut buffers = InputBuffers::new();
    run_frame(&mut buffers, &raw_with(&[(GameButton::Start, true)], -32768, -32768));

    let disconnected = run_frame(&mut buffers, &RawInput::default());
    assert_eq!(disconnected.controllers[0], ControllerInput::default());
}

#[test]
fn test_buttons_iterate_in_index_order() {
    let controller = ControllerInput::default();
    let order: Vec<GameButton> = controller.buttons().map(|(button, _)| button).collect();
    assert_eq!(order, GameButton::ALL.to_vec());
    for (index, button) in GameButton::ALL.iter().enumerate() {
        assert_eq!(button.index(), index);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_half_transitions_equal_adjacent_differences(
        sequence in proptest::collection::vec(any::<bool>(), 1..64)
    ) {
        let mut buffers = InputBuffers::new();
        let mut last = GameInput::default();
        for &is_down in &sequence {
            last = run_frame(&mut buffers, &raw_with(&[(GameButton::RightShoulder, is_down)], 0, 0));
        }

        // The implicit frame before the first one is "released"
        let mut expected = u32::from(sequence[0]);
        expected += sequence.windows(2).filter(|pair| pair[0] != pair[1]).count() as u32;

        let button = last.controllers[0].button(GameButton::RightShoulder);
        prop_assert_eq!(button.half_transition_count, expected);
        prop_assert_eq!(button.ended_down, *sequence.last().unwrap());
    }

    #[test]
    fn prop_replaying_same_reading_never_counts(is_down in any::<bool>(), repeats in 1usize..16) {
        let mut buffers = InputBuffers::new();
        let first = run_frame(&mut buffers, &raw_with(&[(GameButton::Back, is_down)], 0, 0));
        let mut last = first;
        for _ in 0..repeats {
            last = run_frame(&mut buffers, &raw_with(&[(GameButton::Back, is_down)], 0, 0));
        }

        prop_assert_eq!(
            last.controllers[0].button(GameButton::Back).half_transition_count,
            first.controllers[0].button(GameButton::Back).half_transition_count
        );
    }

    #[test]
    fn prop_normalized_axis_in_range(value in any::<i16>()) {
        let normalized = normalize_stick_axis(value);
        prop_assert!((-1.0..=1.0).contains(&normalized));
    }
}
