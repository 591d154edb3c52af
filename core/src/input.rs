//! Controller input snapshots and the frame-over-frame double buffer
//!
//! The platform layer fills a [`RawInput`] each frame from whatever devices it
//! polls. [`InputBuffers`] turns that into a [`GameInput`] by comparing every
//! button against the previous frame's snapshot, then swaps the two snapshots
//! once the simulation has consumed the new one.

#[cfg(test)]
mod tests;

/// Number of controller slots in a [`GameInput`]
pub const MAX_CONTROLLERS: usize = 4;

/// Named controller buttons.
///
/// The discriminant is the button's index into [`ControllerInput`]'s button
/// array, so buttons can be iterated by index or addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameButton {
    Up,
    Down,
    Left,
    Right,
    LeftShoulder,
    RightShoulder,
    Start,
    Back,
}

impl GameButton {
    /// Number of named buttons
    pub const COUNT: usize = 8;

    /// All buttons in index order
    pub const ALL: [GameButton; Self::COUNT] = [
        GameButton::Up,
        GameButton::Down,
        GameButton::Left,
        GameButton::Right,
        GameButton::LeftShoulder,
        GameButton::RightShoulder,
        GameButton::Start,
        GameButton::Back,
    ];

    /// Index of this button in the button array
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// State of one button at the end of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Number of up/down flips observed so far (press + release = 2)
    pub half_transition_count: u32,
    /// Whether the button was held when the frame was captured
    pub ended_down: bool,
}

impl ButtonState {
    /// Compute this frame's state from the previous frame's state and the raw reading.
    ///
    /// `ended_down` always takes the raw value. The half-transition count is
    /// carried from `old` and bumped by exactly one when the value flipped.
    pub fn process(old: &ButtonState, is_down: bool) -> ButtonState {
        let flipped = old.ended_down != is_down;
        ButtonState {
            half_transition_count: old.half_transition_count + u32::from(flipped),
            ended_down: is_down,
        }
    }
}

/// Stick position for one frame.
///
/// Only `end_*` is measured. `min_*` and `max_*` equal `end_*` (no intra-frame
/// tracking), and `start_*` is the previous frame's `end_*`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickState {
    pub start_x: f32,
    pub start_y: f32,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

/// One controller slot in a [`GameInput`] snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    pub is_connected: bool,
    pub is_analog: bool,
    pub stick: StickState,
    buttons: [ButtonState; GameButton::COUNT],
}

impl ControllerInput {
    /// State of a named button
    pub fn button(&self, button: GameButton) -> &ButtonState {
        &self.buttons[button.index()]
    }

    /// Mutable state of a named button
    pub fn button_mut(&mut self, button: GameButton) -> &mut ButtonState {
        &mut self.buttons[button.index()]
    }

    /// Iterate over all buttons in index order
    pub fn buttons(&self) -> impl Iterator<Item = (GameButton, &ButtonState)> {
        GameButton::ALL.into_iter().zip(self.buttons.iter())
    }
}

/// Controller input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameInput {
    pub controllers: [ControllerInput; MAX_CONTROLLERS],
}

/// Raw device reading for one connected controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawControllerState {
    /// Whether the device reports an analog stick
    pub analog: bool,
    /// Button readings, indexed by [`GameButton::index`]
    pub buttons: [bool; GameButton::COUNT],
    /// Stick X in the signed 16-bit device range
    pub stick_x: i16,
    /// Stick Y in the signed 16-bit device range
    pub stick_y: i16,
}

impl RawControllerState {
    /// Set one button reading
    pub fn set_button(&mut self, button: GameButton, is_down: bool) {
        self.buttons[button.index()] = is_down;
    }
}

/// Raw device readings for all slots; `None` marks a disconnected slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawInput {
    pub controllers: [Option<RawControllerState>; MAX_CONTROLLERS],
}

/// Normalize a signed 16-bit stick axis to `[-1, 1]`.
///
/// Negative readings divide by the negative lower bound, non-negative readings
/// by the negative upper bound, so the result is sign-flipped relative to the
/// device value and both extremes map exactly to +/-1.
pub fn normalize_stick_axis(value: i16) -> f32 {
    if value < 0 {
        f32::from(value) / -32768.0
    } else {
        f32::from(value) / -32767.0
    }
}

/// The two live [`GameInput`] snapshots.
///
/// One is "new" (written this frame), the other "old" (last frame, read-only
/// while the new one is written). [`InputBuffers::swap`] exchanges the roles.
#[derive(Debug, Clone, Default)]
pub struct InputBuffers {
    inputs: [GameInput; 2],
    new_index: usize,
}

impl InputBuffers {
    /// Create both snapshots zeroed, with slot 0 as the first "new" snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the new snapshot from the raw readings and the old snapshot.
    ///
    /// Returns `(new, old)`.
    pub fn capture(&mut self, raw: &RawInput) -> (&GameInput, &GameInput) {
        let [first, second] = &mut self.inputs;
        let (new_input, old_input) = if self.new_index == 0 {
            (first, &*second)
        } else {
            (second, &*first)
        };

        for (slot, raw_controller) in raw.controllers.iter().enumerate() {
            let old = &old_input.controllers[slot];
            new_input.controllers[slot] = match raw_controller {
                Some(raw_controller) => process_controller(old, raw_controller),
                None => ControllerInput::default(),
            };
        }

        (&*new_input, old_input)
    }

    /// Exchange the roles of the two snapshots
    pub fn swap(&mut self) {
        self.new_index ^= 1;
    }

    /// The snapshot written by the last [`InputBuffers::capture`]
    pub fn new_input(&self) -> &GameInput {
        &self.inputs[self.new_index]
    }

    /// The previous frame's snapshot
    pub fn old_input(&self) -> &GameInput {
        &self.inputs[self.new_index ^ 1]
    }

    /// Which of the two snapshots is currently "new" (0 or 1)
    pub fn new_index(&self) -> usize {
        self.new_index
    }
}

fn process_controller(old: &ControllerInput, raw: &RawControllerState) -> ControllerInput {
    let end_x = normalize_stick_axis(raw.stick_x);
    let end_y = normalize_stick_axis(raw.stick_y);

    let mut controller = ControllerInput {
        is_connected: true,
        is_analog: raw.analog,
        stick: StickState {
            start_x: old.stick.end_x,
            start_y: old.stick.end_y,
            min_x: end_x,
            min_y: end_y,
            max_x: end_x,
            max_y: end_y,
            end_x,
            end_y,
        },
        buttons: [ButtonState::default(); GameButton::COUNT],
    };

    for button in GameButton::ALL {
        let is_down = raw.buttons[button.index()];
        *controller.button_mut(button) = ButtonState::process(old.button(button), is_down);
    }

    controller
}
