//! Window event loop and the platform context it drives
//!
//! Everything the platform layer owns lives in [`PlatformContext`], created
//! once the window exists and dropped when the loop exits.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use everyday_core::config::Config;
use everyday_core::{
    AudioRingBuffer, FrameRunner, GameMemory, OffscreenBuffer, PlatformApi, SharedAudioRing,
};
use everyday_game::EverydayGame;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::audio::AudioOutput;
use crate::graphics::Presenter;
use crate::input::InputManager;

/// Measures time between presented frames
#[derive(Debug)]
pub struct FrameTimer {
    last: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Log the time since the previous tick; returns milliseconds per frame
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let ms_per_frame = now.duration_since(self.last).as_secs_f64() * 1000.0;
        self.last = now;

        let fps = if ms_per_frame > 0.0 {
            1000.0 / ms_per_frame
        } else {
            0.0
        };
        tracing::trace!("{:.2} ms/f, {:.2} f/s", ms_per_frame, fps);
        ms_per_frame
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform state for one run of the event loop.
pub struct PlatformContext {
    window: Arc<Window>,
    presenter: Presenter,
    audio: AudioOutput,
    ring: SharedAudioRing,
    input: InputManager,
    buffer: OffscreenBuffer,
    runner: FrameRunner<EverydayGame>,
    timer: FrameTimer,
    running: bool,
}

impl PlatformContext {
    /// Acquire the window-dependent resources. Any failure here is fatal.
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let sound = config
            .audio
            .sound_output()
            .context("Invalid sound output settings")?;
        let ring = AudioRingBuffer::shared(&sound);

        let presenter = Presenter::new(window.clone())?;
        let audio = AudioOutput::new(
            sound.samples_per_second,
            Arc::clone(&ring),
            config.audio.master_volume,
        )
        .context("Failed to open audio output")?;

        let permanent_size = config
            .memory
            .permanent_storage_size()
            .context("Permanent storage size cannot be addressed")?;
        let transient_size = config
            .memory
            .transient_storage_size()
            .context("Transient storage size cannot be addressed")?;
        let memory = GameMemory::new(permanent_size, transient_size, PlatformApi::default())
            .context("Failed to allocate game memory")?;

        let size = window.inner_size();
        let buffer = OffscreenBuffer::new(size.width as usize, size.height as usize);

        Ok(Self {
            window,
            presenter,
            audio,
            ring,
            input: InputManager::new(config.input.clone()),
            buffer,
            runner: FrameRunner::new(EverydayGame, memory, sound),
            timer: FrameTimer::new(),
            running: true,
        })
    }

    /// Reallocate the pixel buffer and reconfigure the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        self.buffer.resize(width as usize, height as usize);
        self.presenter.resize(width, height);
        tracing::debug!("Offscreen buffer resized to {}x{}", width, height);
    }

    /// Run one frame and present it.
    pub fn frame(&mut self) -> Result<()> {
        self.input.update();
        let report = self
            .runner
            .run_frame(self.input.raw_input(), &mut self.buffer, &self.ring)
            .context("Frame failed")?;

        if !self.audio.is_playing() && report.window.sample_count > 0 {
            self.audio.start().context("Failed to start audio")?;
        }

        self.presenter.present(&self.buffer)?;
        self.timer.tick();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_exit(&mut self) {
        self.running = false;
    }
}

/// winit application: owns the configuration until the window exists.
pub struct App {
    config: Config,
    context: Option<PlatformContext>,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            context: None,
            fatal: None,
        }
    }

    /// Stop the loop; `run` hands the error back to the caller
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.fatal = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let error = anyhow::Error::new(e).context("Failed to create window");
                self.fail(event_loop, error);
                return;
            }
        };

        match PlatformContext::new(window, &self.config) {
            Ok(context) => {
                event_loop.set_control_flow(ControlFlow::Poll);
                self.context = Some(context);
                tracing::info!("Platform initialized");
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(context) = &mut self.context else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                context.request_exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && state == ElementState::Pressed {
                    context.request_exit();
                } else if !repeat {
                    context.input.update_keyboard(key, state.is_pressed());
                }
            }
            WindowEvent::Resized(size) => context.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = context.frame() {
                    self.fail(event_loop, e);
                    return;
                }
            }
            _ => {}
        }

        if !context.is_running() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(context) = &self.context {
            context.window.request_redraw();
        }
    }
}

/// Run the event loop until the window closes.
///
/// Returns the fatal error that stopped the loop, if any.
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new()?;

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
