//! Tests for frame orchestration

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use super::*;
use crate::audio::AudioRingBuffer;
use crate::buffer::OffscreenBufferView;
use crate::file::PlatformApi;
use crate::input::{GameButton, GameInput, RawControllerState};
use crate::memory::kilobytes;

#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct ProbeState {
    frames: u32,
    down_transitions: u32,
}

/// Counts frames in memory, stamps the frame number into pixel (0, 0) and
/// writes a ramp of samples
struct ProbeSimulation;

impl Simulation for ProbeSimulation {
    fn update_and_render(
        &self,
        memory: &mut GameMemory,
        input: &GameInput,
        buffer: &mut OffscreenBufferView<'_>,
        sound: &mut SoundOutputBuffer<'_>,
    ) -> Result<(), SimulationError> {
        memory.is_initialized = true;
        let state = memory.state_mut::<ProbeState>()?;
        state.frames += 1;
        state.down_transitions = input.controllers[0]
            .button(GameButton::Down)
            .half_transition_count;

        buffer.set_pixel(0, 0, state.frames);
        assert_eq!(sound.samples.len(), sound.sample_count * 2);
        for (i, sample) in sound.samples.iter_mut().enumerate() {
            *sample = i as i16;
        }
        sound.phase += sound.sample_count as f32;
        Ok(())
    }
}

/// Always fails to view its state
struct OversizedSimulation;

impl Simulation for OversizedSimulation {
    fn update_and_render(
        &self,
        memory: &mut GameMemory,
        _input: &GameInput,
        _buffer: &mut OffscreenBufferView<'_>,
        _sound: &mut SoundOutputBuffer<'_>,
    ) -> Result<(), SimulationError> {
        memory.state_mut::<[u64; 1024]>()?;
        Ok(())
    }
}

fn runner<S: Simulation>(simulation: S) -> (FrameRunner<S>, SharedAudioRing) {
    let sound = SoundOutput::stereo_i16(48_000).unwrap();
    let ring = AudioRingBuffer::shared(&sound);
    let memory = GameMemory::new(kilobytes(4), 0, PlatformApi::default()).unwrap();
    (FrameRunner::new(simulation, memory, sound), ring)
}

fn down_input(is_down: bool) -> RawInput {
    let mut controller = RawControllerState::default();
    controller.set_button(GameButton::Down, is_down);
    let mut raw = RawInput::default();
    raw.controllers[0] = Some(controller);
    raw
}

// ============================================================================
// Frame Sequencing Tests
// ============================================================================

#[test]
fn test_first_frame_fills_latency_lead() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(4, 4);

    let report = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap();

    assert_eq!(report.frame_index, 0);
    assert_eq!(report.window.byte_to_lock, 0);
    assert_eq!(report.window.sample_count, 3200);
    assert!(!report.fell_behind);
    assert_eq!(runner.sound_output().running_sample_index, 3200);
    assert_eq!(runner.frame_index(), 1);

    // Sample 1 of the ramp lands in bytes 2..4
    let ring = ring.lock().unwrap();
    assert_eq!(&ring.as_bytes()[2..4], &1i16.to_le_bytes());
}

#[test]
fn test_no_samples_requested_without_playback() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(4, 4);

    runner.run_frame(&RawInput::default(), &mut buffer, &ring).unwrap();
    let report = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap();
    assert_eq!(report.window.sample_count, 0);
}

#[test]
fn test_requests_what_the_device_consumed() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(4, 4);

    runner.run_frame(&RawInput::default(), &mut buffer, &ring).unwrap();
    ring.lock().unwrap().consume(&mut [0u8; 4096]);

    let report = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap();
    assert_eq!(report.window.sample_count, 1024);
    assert!(!report.fell_behind);
}

#[test]
fn test_reports_fell_behind() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(4, 4);

    runner.run_frame(&RawInput::default(), &mut buffer, &ring).unwrap();
    ring.lock().unwrap().consume(&mut [0u8; 20_000]);

    let report = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap();
    assert!(report.fell_behind);
}

#[test]
fn test_state_and_pixels_persist_across_frames() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(4, 4);

    for _ in 0..3 {
        runner.run_frame(&RawInput::default(), &mut buffer, &ring).unwrap();
    }

    assert!(runner.memory().is_initialized);
    assert_eq!(runner.memory_mut().state_mut::<ProbeState>().unwrap().frames, 3);
    assert_eq!(buffer.view_mut().pixel(0, 0), Some(3));
}

#[test]
fn test_simulation_sees_new_snapshot_and_buffers_swap() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(1, 1);

    for is_down in [true, false, true] {
        runner.run_frame(&down_input(is_down), &mut buffer, &ring).unwrap();
    }

    let state = *runner.memory_mut().state_mut::<ProbeState>().unwrap();
    assert_eq!(state.down_transitions, 3);
    assert_eq!(runner.input().new_index(), 1);
    assert!(runner.input().old_input().controllers[0]
        .button(GameButton::Down)
        .ended_down);
}

#[test]
fn test_phase_carried_back() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(1, 1);

    runner.run_frame(&RawInput::default(), &mut buffer, &ring).unwrap();
    assert_eq!(runner.sound_output().phase, 3200.0);
}

#[test]
fn test_zero_sized_buffer_still_runs() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(0, 0);
    assert!(runner.run_frame(&RawInput::default(), &mut buffer, &ring).is_ok());
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "does not fit permanent storage"))]
fn test_simulation_error_propagates() {
    let (mut runner, ring) = runner(OversizedSimulation);
    let mut buffer = OffscreenBuffer::new(1, 1);

    let err = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap_err();
    assert!(matches!(
        err,
        FrameError::Simulation(SimulationError::Memory(_))
    ));
    assert_eq!(runner.frame_index(), 0);
}

#[test]
fn test_poisoned_ring_is_reported() {
    let (mut runner, ring) = runner(ProbeSimulation);
    let mut buffer = OffscreenBuffer::new(1, 1);

    let poisoner = Arc::clone(&ring);
    let _ = std::thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("poison the ring");
    })
    .join();

    let err = runner
        .run_frame(&RawInput::default(), &mut buffer, &ring)
        .unwrap_err();
    assert_eq!(err, FrameError::Audio(AudioError::Poisoned));
}
