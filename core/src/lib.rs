//! Everyday Core - platform-independent frame loop
//!
//! This crate holds everything between the platform layer (window, devices)
//! and the simulation that does not depend on an operating system API.
//!
//! # Architecture
//!
//! - [`InputBuffers`] - ping-pong controller snapshots with half-transition counting
//! - [`AudioRingBuffer`] / [`SoundOutput`] - circular audio buffer kept ahead of the play cursor
//! - [`OffscreenBuffer`] - raw pixel memory exposed through a bounds-checked view
//! - [`Simulation`] - the single update/render entry point
//! - [`FrameRunner`] - sequences one frame: input, audio window, update, swap, commit

pub mod audio;
pub mod buffer;
pub mod config;
pub mod file;
pub mod frame;
pub mod input;
pub mod memory;
pub mod simulation;

pub use audio::{
    AudioError, AudioRingBuffer, AudioWindow, SharedAudioRing, SoundOutput, split_regions,
};
pub use buffer::{BYTES_PER_PIXEL, BufferError, OffscreenBuffer, OffscreenBufferView, pack_rgb};
pub use config::{Config, ConfigError};
pub use file::{
    PlatformApi, ReadFileResult, debug_free_file_memory, debug_read_entire_file,
    debug_write_entire_file,
};
pub use frame::{FrameError, FrameReport, FrameRunner};
pub use input::{
    ButtonState, ControllerInput, GameButton, GameInput, InputBuffers, MAX_CONTROLLERS,
    RawControllerState, RawInput, StickState, normalize_stick_axis,
};
pub use memory::{GameMemory, MemoryError, gigabytes, kilobytes, megabytes};
pub use simulation::{Simulation, SimulationError, SoundOutputBuffer};
