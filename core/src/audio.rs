//! Audio ring buffer and the per-frame write scheduler
//!
//! The ring holds one second of interleaved 16-bit audio. The device callback
//! drains it from the play cursor; the frame thread writes ahead of the play
//! cursor by `latency_sample_count` samples. Both sides split their range in two
//! when it crosses the end of the buffer.


use std::ops::Range;
use std::sync::{Arc, Mutex};

/// Errors from sound output setup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// Latency lead would reach around the whole ring and overwrite unplayed audio
    #[error(
        "latency of {latency_bytes} bytes does not fit a ring buffer of {buffer_size} bytes"
    )]
    LatencyExceedsBuffer {
        latency_bytes: usize,
        buffer_size: usize,
    },

    /// Zero sample rate or channel count
    #[error("invalid sound format: {samples_per_second} Hz, {channels} channel(s)")]
    InvalidFormat { samples_per_second: u32, channels: u16 },

    /// The ring mutex was poisoned by a panicking holder
    #[error("audio ring buffer lock poisoned")]
    Poisoned,
}

/// Ring buffer shared between the frame thread and the device callback
pub type SharedAudioRing = Arc<Mutex<AudioRingBuffer>>;

/// Scheduler state for the sound output.
///
/// Tracks how many samples have ever been generated and how far ahead of the
/// play cursor the frame thread keeps the ring filled.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundOutput {
    pub samples_per_second: u32,
    /// Bytes per sample frame (all channels)
    pub bytes_per_sample: usize,
    /// Ring size in bytes (one second of audio)
    pub secondary_buffer_size: usize,
    /// Samples to stay ahead of the play cursor
    pub latency_sample_count: usize,
    /// Monotonic count of sample frames committed to the ring
    pub running_sample_index: u64,
    /// Oscillator phase handed to the simulation and back each frame
    pub phase: f32,
}

impl SoundOutput {
    /// Create a 16-bit sound output with `channels` interleaved channels.
    pub fn new(
        samples_per_second: u32,
        channels: u16,
        latency_sample_count: usize,
    ) -> Result<Self, AudioError> {
        if samples_per_second == 0 || channels == 0 {
            return Err(AudioError::InvalidFormat {
                samples_per_second,
                channels,
            });
        }

        let bytes_per_sample = std::mem::size_of::<i16>() * channels as usize;
        let secondary_buffer_size = samples_per_second as usize * bytes_per_sample;
        // An overflowing product is as far past the ring as it gets
        let latency_bytes = latency_sample_count
            .checked_mul(bytes_per_sample)
            .unwrap_or(usize::MAX);
        if latency_bytes >= secondary_buffer_size {
            return Err(AudioError::LatencyExceedsBuffer {
                latency_bytes,
                buffer_size: secondary_buffer_size,
            });
        }

        Ok(Self {
            samples_per_second,
            bytes_per_sample,
            secondary_buffer_size,
            latency_sample_count,
            running_sample_index: 0,
            phase: 0.0,
        })
    }

    /// 16-bit stereo with a latency of 1/15 s
    pub fn stereo_i16(samples_per_second: u32) -> Result<Self, AudioError> {
        Self::new(samples_per_second, 2, samples_per_second as usize / 15)
    }

    /// Latency lead in bytes. Saturates for a latency set past the ring.
    pub fn latency_bytes(&self) -> usize {
        self.latency_sample_count.saturating_mul(self.bytes_per_sample)
    }

    /// Number of `i16` values in one sample frame
    pub fn channels(&self) -> usize {
        self.bytes_per_sample / std::mem::size_of::<i16>()
    }

    /// Compute this frame's write window given the device play cursor.
    ///
    /// `byte_to_lock` is the next byte not yet written; the window extends up
    /// to `target_cursor`, the play cursor plus the latency lead.
    pub fn write_window(&self, play_cursor: usize) -> AudioWindow {
        debug_assert!(self.latency_bytes() < self.secondary_buffer_size);

        let size = self.secondary_buffer_size;
        let byte_to_lock =
            ((self.running_sample_index * self.bytes_per_sample as u64) % size as u64) as usize;
        let target_cursor = (play_cursor + self.latency_bytes()) % size;

        let bytes_to_write = if byte_to_lock > target_cursor {
            (size - byte_to_lock) + target_cursor
        } else {
            target_cursor - byte_to_lock
        };

        AudioWindow {
            byte_to_lock,
            target_cursor,
            bytes_to_write,
            sample_count: bytes_to_write / self.bytes_per_sample,
        }
    }
}

/// Region of the ring the frame thread fills this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioWindow {
    /// Byte offset where writing starts
    pub byte_to_lock: usize,
    /// Byte offset the write should reach (play cursor + latency)
    pub target_cursor: usize,
    /// Bytes to write, possibly wrapping past the end of the ring
    pub bytes_to_write: usize,
    /// Sample frames the simulation must produce
    pub sample_count: usize,
}

impl AudioWindow {
    /// True when the window is longer than the latency lead.
    ///
    /// The write position has fallen behind the play cursor and the window
    /// now covers audio the device is about to play.
    pub fn fell_behind(&self, latency_bytes: usize) -> bool {
        self.bytes_to_write > latency_bytes
    }
}

/// Split `len` bytes starting at `offset` into the part before the end of a
/// ring of `size` bytes and the part that wraps to the start.
pub fn split_regions(offset: usize, len: usize, size: usize) -> (Range<usize>, Range<usize>) {
    debug_assert!(offset < size || size == 0);
    debug_assert!(len <= size);

    let region1_size = len.min(size - offset);
    let region2_size = len - region1_size;
    (offset..offset + region1_size, 0..region2_size)
}

/// Fixed-size circular byte buffer read by the audio device.
#[derive(Debug, Clone)]
pub struct AudioRingBuffer {
    data: Vec<u8>,
    play_cursor: usize,
    write_cursor: usize,
}

impl AudioRingBuffer {
    /// Allocate a zeroed ring of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            play_cursor: 0,
            write_cursor: 0,
        }
    }

    /// Allocate a ring sized for `output` and wrap it for sharing with the device thread
    pub fn shared(output: &SoundOutput) -> SharedAudioRing {
        Arc::new(Mutex::new(Self::new(output.secondary_buffer_size)))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Next byte the device will play
    pub fn play_cursor(&self) -> usize {
        self.play_cursor
    }

    /// End of the region the device has already requested
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Commit generated samples into `window`, advancing the running sample index.
    ///
    /// `samples` holds interleaved `i16` values, `output.channels()` per sample
    /// frame, and must cover `window.sample_count` frames.
    pub fn fill(&mut self, output: &mut SoundOutput, window: &AudioWindow, samples: &[i16]) {
        debug_assert_eq!(self.size(), output.secondary_buffer_size);

        let bytes_per_sample = output.bytes_per_sample;
        let (region1, region2) =
            split_regions(window.byte_to_lock, window.bytes_to_write, self.size());

        let mut frames = samples.chunks_exact(output.channels());
        for region in [region1, region2] {
            // Each region holds region.len() / bytes_per_sample whole sample frames
            for out in self.data[region].chunks_exact_mut(bytes_per_sample) {
                let Some(frame) = frames.next() else {
                    return;
                };
                for (bytes, sample) in out.chunks_exact_mut(2).zip(frame) {
                    bytes.copy_from_slice(&sample.to_le_bytes());
                }
                output.running_sample_index += 1;
            }
        }
    }

    /// Drain `out.len()` bytes starting at the play cursor.
    ///
    /// This is the device callback's side of the ring. Both cursors advance;
    /// the write cursor ends up one request ahead of the new play cursor.
    pub fn consume(&mut self, out: &mut [u8]) {
        let size = self.size();
        if out.is_empty() || size == 0 {
            return;
        }

        for chunk in out.chunks_mut(size) {
            let amount = chunk.len();
            let (region1, region2) = split_regions(self.play_cursor, amount, size);
            let (head, tail) = chunk.split_at_mut(region1.len());
            head.copy_from_slice(&self.data[region1]);
            tail.copy_from_slice(&self.data[region2]);

            self.play_cursor = (self.play_cursor + amount) % size;
            self.write_cursor = (self.play_cursor + amount) % size;
        }
    }
}
