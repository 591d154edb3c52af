//! Audio output using cpal, fed from the shared ring buffer
//!
//! The device callback drains `data.len() * 2` bytes of 16-bit samples from
//! the ring on every call. The stream stays paused until the first frame has
//! committed its latency lead.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use everyday_core::SharedAudioRing;
use tracing::{debug, error, info};

/// Errors opening the audio device
#[derive(Debug, thiserror::Error)]
pub enum AudioOutputError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("failed to get default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build audio stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to play audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Stereo output stream reading from a [`SharedAudioRing`].
pub struct AudioOutput {
    /// The cpal stream (kept alive for the duration)
    stream: cpal::Stream,
    playing: bool,
}

impl AudioOutput {
    /// Open the default output device as 2-channel audio at `samples_per_second`.
    pub fn new(
        samples_per_second: u32,
        ring: SharedAudioRing,
        master_volume: f32,
    ) -> Result<Self, AudioOutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioOutputError::NoDevice)?;

        let sample_format = device.default_output_config()?.sample_format();
        let config = cpal::StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(samples_per_second),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match sample_format {
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, ring, master_volume)?,
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, ring, master_volume)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, ring, master_volume)?,
            other => return Err(AudioOutputError::UnsupportedFormat(other)),
        };

        info!(
            "Audio output opened: {} Hz, 2 channels, device format {:?}",
            samples_per_second, sample_format
        );

        Ok(Self {
            stream,
            playing: false,
        })
    }

    /// Start playback once the ring holds audio. Later calls do nothing.
    pub fn start(&mut self) -> Result<(), AudioOutputError> {
        if !self.playing {
            self.stream.play()?;
            self.playing = true;
            debug!("Audio stream started");
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    ring: SharedAudioRing,
    master_volume: f32,
) -> Result<cpal::Stream, AudioOutputError>
where
    T: SizedSample + FromSample<i16>,
{
    // Pre-allocate buffer for ring reads
    let mut scratch: Vec<u8> = vec![0; 8192];
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let byte_len = data.len() * std::mem::size_of::<i16>();
            if scratch.len() < byte_len {
                scratch.resize(byte_len, 0);
            }
            let bytes = &mut scratch[..byte_len];
            drain_ring(&ring, bytes);

            for (out, pair) in data.iter_mut().zip(bytes.chunks_exact(2)) {
                let sample = i16::from_le_bytes([pair[0], pair[1]]);
                *out = T::from_sample(scale_sample(sample, master_volume));
            }
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

/// Copy the next `out.len()` bytes from the ring; silence if the lock is poisoned
pub(crate) fn drain_ring(ring: &SharedAudioRing, out: &mut [u8]) {
    match ring.lock() {
        Ok(mut ring) => ring.consume(out),
        Err(_) => out.fill(0),
    }
}

pub(crate) fn scale_sample(sample: i16, volume: f32) -> i16 {
    (f32::from(sample) * volume).clamp(-32768.0, 32767.0) as i16
}
