//! Everyday Hero platform layer
//!
//! Window and event loop (winit), presentation of the offscreen buffer
//! (wgpu), the audio device (cpal) and controllers (gilrs plus keyboard).
//! All of it is owned by an explicit [`PlatformContext`].

pub mod app;
pub mod audio;
pub mod graphics;
pub mod input;

pub use app::{App, FrameTimer, PlatformContext, run};
pub use audio::{AudioOutput, AudioOutputError};
pub use graphics::Presenter;
pub use input::InputManager;
