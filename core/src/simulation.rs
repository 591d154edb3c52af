//! The update/render contract between the platform layer and the simulation

use crate::buffer::{BufferError, OffscreenBufferView};
use crate::input::GameInput;
use crate::memory::{GameMemory, MemoryError};

/// Errors a simulation can report back to the frame loop
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("game memory: {0}")]
    Memory(#[from] MemoryError),

    #[error("pixel buffer: {0}")]
    Buffer(#[from] BufferError),
}

/// Audio the simulation must produce this frame.
///
/// `samples` holds exactly `sample_count` interleaved stereo frames.
#[derive(Debug)]
pub struct SoundOutputBuffer<'a> {
    pub samples_per_second: u32,
    pub sample_count: usize,
    pub samples: &'a mut [i16],
    /// Oscillator phase in radians, handed in and read back after the call
    pub phase: f32,
}

/// A simulation driven once per frame.
///
/// Takes `&self`: every piece of mutable state must live in `memory`, which
/// is what lets the platform swap the implementation without losing state.
pub trait Simulation {
    /// Advance one frame, filling every pixel of `buffer` and every sample of `sound`.
    fn update_and_render(
        &self,
        memory: &mut GameMemory,
        input: &GameInput,
        buffer: &mut OffscreenBufferView<'_>,
        sound: &mut SoundOutputBuffer<'_>,
    ) -> Result<(), SimulationError>;
}
