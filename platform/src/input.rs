//! Input manager handling keyboard and gamepads
//!
//! Produces the [`RawInput`] snapshot the frame runner consumes. Gamepads take
//! the first free slot when they connect and free it when they disconnect.
//! The keyboard drives slot 0 as a digital controller whenever no gamepad
//! holds that slot.

#[cfg(feature = "gamepad")]
mod gamepad;
mod keyboard;
#[cfg(test)]
mod tests;

use everyday_core::config::InputConfig;
use everyday_core::{MAX_CONTROLLERS, RawInput};
#[cfg(feature = "gamepad")]
use gilrs::Gilrs;
use hashbrown::HashMap;
use winit::keyboard::KeyCode;

pub struct InputManager {
    /// Gilrs context (None if initialization failed)
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Current keyboard state (key -> pressed)
    keyboard_state: HashMap<KeyCode, bool>,

    config: InputConfig,

    /// Raw readings for every slot, rebuilt by `update`
    raw: RawInput,

    /// Gamepad ID to controller slot mapping
    #[cfg(feature = "gamepad")]
    gamepad_to_slot: HashMap<gilrs::GamepadId, usize>,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        let manager = Self::without_gamepads(config);

        #[cfg(feature = "gamepad")]
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        };
        #[cfg(feature = "gamepad")]
        let manager = Self { gilrs, ..manager };

        manager
    }

    /// Keyboard-only manager
    pub fn without_gamepads(config: InputConfig) -> Self {
        Self {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            keyboard_state: HashMap::new(),
            config,
            raw: RawInput::default(),
            #[cfg(feature = "gamepad")]
            gamepad_to_slot: HashMap::new(),
        }
    }

    /// Record a key press or release
    pub fn update_keyboard(&mut self, key: KeyCode, pressed: bool) {
        self.keyboard_state.insert(key, pressed);
    }

    /// Poll gamepad events and rebuild the raw snapshot
    #[cfg(feature = "gamepad")]
    pub fn update(&mut self) {
        if let Some(ref mut gilrs) = self.gilrs {
            while let Some(event) = gilrs.next_event() {
                match event.event {
                    gilrs::EventType::Connected => {
                        let free_slot = (0..MAX_CONTROLLERS)
                            .find(|&slot| !self.gamepad_to_slot.values().any(|&s| s == slot));
                        if let Some(slot) = free_slot {
                            self.gamepad_to_slot.insert(event.id, slot);
                            tracing::info!("Gamepad {} connected as controller {}", event.id, slot);
                        } else {
                            tracing::warn!(
                                "Gamepad {} connected but no free controller slots",
                                event.id
                            );
                        }
                    }
                    gilrs::EventType::Disconnected => {
                        if let Some(slot) = self.gamepad_to_slot.remove(&event.id) {
                            tracing::info!("Gamepad {} (controller {}) disconnected", event.id, slot);
                            self.raw.controllers[slot] = None;
                        }
                    }
                    _ => {}
                }
            }
        }

        let keyboard_slot_free = !self.gamepad_to_slot.values().any(|&slot| slot == 0);
        self.raw.controllers[0] = keyboard_slot_free.then(|| self.read_keyboard_input());

        if let Some(ref gilrs) = self.gilrs {
            for (gamepad_id, &slot) in &self.gamepad_to_slot {
                let gamepad = gilrs.gamepad(*gamepad_id);
                self.raw.controllers[slot] = Some(self.read_gamepad_input(&gamepad));
            }
        }
    }

    /// Rebuild the raw snapshot (keyboard only when the gamepad feature is disabled)
    #[cfg(not(feature = "gamepad"))]
    pub fn update(&mut self) {
        self.raw.controllers[0] = Some(self.read_keyboard_input());
    }

    /// Snapshot built by the last `update`
    pub fn raw_input(&self) -> &RawInput {
        &self.raw
    }

    /// Apply deadzone to an analog stick axis in `[-1, 1]`
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    pub(crate) fn apply_stick_deadzone(&self, value: f32) -> f32 {
        let deadzone = self.config.stick_deadzone;
        if value.abs() < deadzone {
            0.0
        } else {
            // Scale to full range after deadzone
            let sign = value.signum();
            let magnitude = (value.abs() - deadzone) / (1.0 - deadzone);
            sign * magnitude.clamp(0.0, 1.0)
        }
    }
}

/// Convert an axis in `[-1, 1]` to the signed 16-bit device range
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub(crate) fn axis_to_raw(value: f32) -> i16 {
    (value * 32767.0).round().clamp(-32768.0, 32767.0) as i16
}
