//! One frame of the platform loop
//!
//! [`FrameRunner::run_frame`] captures input, works out how much audio the
//! device needs, runs the simulation, swaps the input snapshots and commits
//! the generated samples into the ring, in that order.

#[cfg(test)]
mod tests;

use tracing::{trace, warn};

use crate::audio::{AudioError, AudioWindow, SharedAudioRing, SoundOutput};
use crate::buffer::OffscreenBuffer;
use crate::input::{InputBuffers, RawInput};
use crate::memory::GameMemory;
use crate::simulation::{Simulation, SimulationError, SoundOutputBuffer};

/// Errors that abort a frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("audio: {0}")]
    Audio(#[from] AudioError),
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub window: AudioWindow,
    /// The write position had lost its lead over the play cursor
    pub fell_behind: bool,
}

/// Drives a [`Simulation`] one frame at a time.
pub struct FrameRunner<S> {
    simulation: S,
    memory: GameMemory,
    input: InputBuffers,
    sound: SoundOutput,
    /// One second of interleaved samples
    samples: Vec<i16>,
    frame_index: u64,
}

impl<S: Simulation> FrameRunner<S> {
    pub fn new(simulation: S, memory: GameMemory, sound: SoundOutput) -> Self {
        let samples = vec![0; sound.samples_per_second as usize * sound.channels()];
        Self {
            simulation,
            memory,
            input: InputBuffers::new(),
            sound,
            samples,
            frame_index: 0,
        }
    }

    /// Run one frame against the current device state.
    pub fn run_frame(
        &mut self,
        raw: &RawInput,
        buffer: &mut OffscreenBuffer,
        ring: &SharedAudioRing,
    ) -> Result<FrameReport, FrameError> {
        let (new_input, _) = self.input.capture(raw);

        let play_cursor = ring.lock().map_err(|_| AudioError::Poisoned)?.play_cursor();
        let window = self.sound.write_window(play_cursor);
        let fell_behind = window.fell_behind(self.sound.latency_bytes());
        if fell_behind {
            warn!(
                frame = self.frame_index,
                byte_to_lock = window.byte_to_lock,
                play_cursor,
                "Audio write position fell behind the play cursor"
            );
        }

        let sample_len = window.sample_count * self.sound.channels();
        let mut sound = SoundOutputBuffer {
            samples_per_second: self.sound.samples_per_second,
            sample_count: window.sample_count,
            samples: &mut self.samples[..sample_len],
            phase: self.sound.phase,
        };
        let mut view = buffer.view_mut();
        self.simulation
            .update_and_render(&mut self.memory, new_input, &mut view, &mut sound)?;
        let phase = sound.phase;

        self.input.swap();

        ring.lock()
            .map_err(|_| AudioError::Poisoned)?
            .fill(&mut self.sound, &window, &self.samples[..sample_len]);
        self.sound.phase = phase;

        trace!(
            frame = self.frame_index,
            samples = window.sample_count,
            running_sample_index = self.sound.running_sample_index,
            "Frame complete"
        );

        let report = FrameReport {
            frame_index: self.frame_index,
            window,
            fell_behind,
        };
        self.frame_index += 1;
        Ok(report)
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn memory(&self) -> &GameMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut GameMemory {
        &mut self.memory
    }

    pub fn input(&self) -> &InputBuffers {
        &self.input
    }

    pub fn sound_output(&self) -> &SoundOutput {
        &self.sound
    }

    /// Frames completed so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
