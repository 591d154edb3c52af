//! Offscreen pixel buffer
//!
//! Row-major 32-bit pixels. Row `y` starts at byte `y * pitch`; pixel `x` of
//! that row is the little-endian `u32` at `y * pitch + x * 4`, so memory order
//! is `BB GG RR XX`.


/// Bytes per pixel in an [`OffscreenBuffer`]
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors from constructing a pixel view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("pitch {pitch} is smaller than a row of {width} pixels")]
    PitchTooSmall { width: usize, pitch: usize },

    #[error("memory of {len} bytes cannot hold {height} rows of pitch {pitch}")]
    MemoryTooSmall {
        len: usize,
        height: usize,
        pitch: usize,
    },
}

/// Pack a full 32-bit RGB pixel (`XX RR GG BB` as a `u32`)
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Pixel memory owned by the platform layer.
///
/// Reallocated on every resize; a view borrowed from it can never outlive
/// the memory it points at.
#[derive(Debug, Clone, Default)]
pub struct OffscreenBuffer {
    memory: Vec<u8>,
    width: usize,
    height: usize,
    pitch: usize,
}

impl OffscreenBuffer {
    /// Allocate a zeroed buffer of `width` x `height` pixels
    pub fn new(width: usize, height: usize) -> Self {
        let mut buffer = Self::default();
        buffer.resize(width, height);
        buffer
    }

    /// Replace the backing memory with a zeroed block for the new size.
    ///
    /// The old contents are dropped before anything can observe the new
    /// dimensions, so no stale pixel survives a resize.
    pub fn resize(&mut self, width: usize, height: usize) {
        let pitch = width * BYTES_PER_PIXEL;
        *self = Self {
            memory: vec![0; height * pitch],
            width,
            height,
            pitch,
        };
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes from the start of one row to the start of the next
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// True for a zero-area buffer (minimized window)
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    /// Read/write view valid until the next resize
    pub fn view_mut(&mut self) -> OffscreenBufferView<'_> {
        OffscreenBufferView {
            memory: &mut self.memory,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
        }
    }
}

/// Bounds-checked view over pixel memory.
#[derive(Debug)]
pub struct OffscreenBufferView<'a> {
    memory: &'a mut [u8],
    width: usize,
    height: usize,
    pitch: usize,
}

impl<'a> OffscreenBufferView<'a> {
    /// Wrap arbitrary memory, checking that every row fits.
    pub fn new(
        memory: &'a mut [u8],
        width: usize,
        height: usize,
        pitch: usize,
    ) -> Result<Self, BufferError> {
        if pitch < width * BYTES_PER_PIXEL {
            return Err(BufferError::PitchTooSmall { width, pitch });
        }
        if memory.len() < height * pitch {
            return Err(BufferError::MemoryTooSmall {
                len: memory.len(),
                height,
                pitch,
            });
        }

        Ok(Self {
            memory,
            width,
            height,
            pitch,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixel bytes of row `y` (`width * 4` bytes, pitch padding excluded)
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.pitch;
        Some(&mut self.memory[start..start + self.width * BYTES_PER_PIXEL])
    }

    /// Iterate over `(y, row)` for every row, top to bottom
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> {
        let row_bytes = self.width * BYTES_PER_PIXEL;
        let height = self.height;
        // chunks_mut panics on a zero chunk size
        let pitch = self.pitch.max(1);
        self.memory
            .chunks_mut(pitch)
            .take(height)
            .map(move |row| &mut row[..row_bytes])
            .enumerate()
    }

    /// Read the pixel at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        let offset = self.offset(x, y)?;
        let bytes = self.memory[offset..offset + BYTES_PER_PIXEL].try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// Write the pixel at `(x, y)`; returns `false` when out of bounds
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u32) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        self.memory[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&value.to_le_bytes());
        true
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: u32) {
        let bytes = value.to_le_bytes();
        for (_, row) in self.rows_mut() {
            for pixel in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&bytes);
            }
        }
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.pitch + x * BYTES_PER_PIXEL)
    }
}
