//! Persistent and transient game memory
//!
//! The simulation owns no state of its own between frames. Everything it keeps
//! lives at the start of the permanent storage block, viewed through
//! [`GameMemory::state_mut`]. The transient block is scratch space.


use bytemuck::{Pod, PodCastError};
use tracing::debug;

use crate::file::PlatformApi;

/// `value` KiB in bytes
pub const fn kilobytes(value: usize) -> usize {
    value * 1024
}

/// `value` MiB in bytes
pub const fn megabytes(value: usize) -> usize {
    kilobytes(value) * 1024
}

/// `value` GiB in bytes
pub const fn gigabytes(value: usize) -> usize {
    megabytes(value) * 1024
}

/// Errors from viewing game state inside storage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("game state of {state_size} bytes does not fit permanent storage of {storage_size} bytes")]
    StateTooLarge {
        state_size: usize,
        storage_size: usize,
    },

    #[error("game state alignment of {align} bytes exceeds storage alignment")]
    StateMisaligned { align: usize },

    #[error("failed to allocate {size} bytes of game memory")]
    Allocation { size: usize },
}

/// Zeroed storage aligned to 8 bytes
struct Storage {
    words: Box<[u64]>,
    len: usize,
}

impl Storage {
    fn zeroed(len: usize) -> Result<Self, MemoryError> {
        let word_count = len.div_ceil(8);
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| MemoryError::Allocation { size: len })?;
        words.resize(word_count, 0u64);
        Ok(Self {
            words: words.into_boxed_slice(),
            len,
        })
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..self.len]
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("len", &self.len).finish()
    }
}

/// Memory handed to the simulation every frame.
#[derive(Debug)]
pub struct GameMemory {
    /// Set by the simulation once it has initialized its state
    pub is_initialized: bool,
    /// Platform services available to the simulation
    pub platform: PlatformApi,
    permanent: Storage,
    transient: Storage,
}

impl GameMemory {
    /// Allocate both storage blocks zeroed
    pub fn new(
        permanent_size: usize,
        transient_size: usize,
        platform: PlatformApi,
    ) -> Result<Self, MemoryError> {
        debug!(permanent_size, transient_size, "Allocating game memory");
        Ok(Self {
            is_initialized: false,
            platform,
            permanent: Storage::zeroed(permanent_size)?,
            transient: Storage::zeroed(transient_size)?,
        })
    }

    pub fn permanent_storage_size(&self) -> usize {
        self.permanent.len
    }

    pub fn transient_storage_size(&self) -> usize {
        self.transient.len
    }

    pub fn permanent_storage_mut(&mut self) -> &mut [u8] {
        self.permanent.bytes_mut()
    }

    pub fn transient_storage_mut(&mut self) -> &mut [u8] {
        self.transient.bytes_mut()
    }

    /// View the start of permanent storage as the simulation's state.
    ///
    /// A state type larger than the permanent block is a programming error:
    /// debug builds stop here, release builds get the error.
    pub fn state_mut<T: Pod>(&mut self) -> Result<&mut T, MemoryError> {
        let state_size = std::mem::size_of::<T>();
        let storage_size = self.permanent.len;
        debug_assert!(
            state_size <= storage_size,
            "game state of {state_size} bytes does not fit permanent storage of {storage_size} bytes"
        );
        if state_size > storage_size {
            return Err(MemoryError::StateTooLarge {
                state_size,
                storage_size,
            });
        }

        let bytes = &mut self.permanent.bytes_mut()[..state_size];
        bytemuck::try_from_bytes_mut(bytes).map_err(|err| match err {
            PodCastError::TargetAlignmentGreaterAndInputNotAligned => {
                MemoryError::StateMisaligned {
                    align: std::mem::align_of::<T>(),
                }
            }
            _ => MemoryError::StateTooLarge {
                state_size,
                storage_size,
            },
        })
    }
}
