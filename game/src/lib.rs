//! Everyday Hero - the simulation
//!
//! A scrolling blue/green gradient and a sine tone. Controller 0 scrolls the
//! gradient and, on an analog stick, bends the pitch. All state lives in
//! [`GameState`] at the start of permanent storage.

mod render;
mod sound;


use bytemuck::{Pod, Zeroable};
use tracing::info;

use everyday_core::{
    GameButton, GameInput, GameMemory, OffscreenBufferView, Simulation, SimulationError,
    SoundOutputBuffer,
};

pub use render::render_gradient;
pub use sound::{TONE_VOLUME, output_sine};

/// Pitch with the stick centered
pub const BASE_TONE_HZ: i32 = 256;

/// Simulation state kept in permanent storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct GameState {
    pub blue_offset: i32,
    pub green_offset: i32,
    pub tone_hz: i32,
}

/// The Everyday Hero simulation. Stateless; see [`GameState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EverydayGame;

impl Simulation for EverydayGame {
    fn update_and_render(
        &self,
        memory: &mut GameMemory,
        input: &GameInput,
        buffer: &mut OffscreenBufferView<'_>,
        sound: &mut SoundOutputBuffer<'_>,
    ) -> Result<(), SimulationError> {
        let first_frame = !memory.is_initialized;
        let state = memory.state_mut::<GameState>()?;
        if first_frame {
            state.tone_hz = BASE_TONE_HZ;
            info!(tone_hz = state.tone_hz, "Game state initialized");
        }

        let controller = &input.controllers[0];
        if controller.is_analog {
            // Truncate the sum, not the step
            let blue = state.blue_offset as f32 + 4.0 * controller.stick.end_x;
            state.blue_offset = blue as i32;
            state.tone_hz = BASE_TONE_HZ + (128.0 * controller.stick.end_y) as i32;
        } else {
            if controller.button(GameButton::Left).ended_down {
                state.blue_offset -= 1;
            }
            if controller.button(GameButton::Right).ended_down {
                state.blue_offset += 1;
            }
        }

        if controller.button(GameButton::Down).ended_down {
            state.green_offset += 1;
        }

        let state = *state;
        memory.is_initialized = true;

        render_gradient(buffer, state.blue_offset, state.green_offset);
        output_sine(sound, state.tone_hz);
        Ok(())
    }
}
