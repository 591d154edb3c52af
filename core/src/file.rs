//! Debug file services offered to the simulation
//!
//! Failures never propagate: a failed read yields an empty result, a failed
//! write yields `false`. Each failure is logged.

#[cfg(test)]
mod tests;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

/// Whole-file read result. Empty on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadFileResult {
    pub contents: Vec<u8>,
}

impl ReadFileResult {
    /// Byte length of the contents (files over 4 GiB are never read)
    pub fn contents_size(&self) -> u32 {
        u32::try_from(self.contents.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

pub type ReadEntireFileFn = fn(&Path) -> ReadFileResult;
pub type WriteEntireFileFn = fn(&Path, &[u8]) -> bool;
pub type FreeFileMemoryFn = fn(ReadFileResult);

/// Platform service table handed to the simulation inside
/// [`GameMemory`](crate::GameMemory).
#[derive(Clone, Copy)]
pub struct PlatformApi {
    pub read_entire_file: ReadEntireFileFn,
    pub write_entire_file: WriteEntireFileFn,
    pub free_file_memory: FreeFileMemoryFn,
}

impl std::fmt::Debug for PlatformApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformApi").finish_non_exhaustive()
    }
}

impl Default for PlatformApi {
    fn default() -> Self {
        Self {
            read_entire_file: debug_read_entire_file,
            write_entire_file: debug_write_entire_file,
            free_file_memory: debug_free_file_memory,
        }
    }
}

/// Read a whole file into memory.
pub fn debug_read_entire_file(path: &Path) -> ReadFileResult {
    match read_bounded(path) {
        Ok(contents) => ReadFileResult { contents },
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            ReadFileResult::default()
        }
    }
}

fn read_bounded(path: &Path) -> io::Result<Vec<u8>> {
    let len = fs::metadata(path)?.len();
    if len > u64::from(u32::MAX) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("file of {len} bytes exceeds the 4 GiB read limit"),
        ));
    }

    let contents = fs::read(path)?;
    // The file may have grown between the size check and the read
    if u32::try_from(contents.len()).is_err() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "file grew past the 4 GiB read limit",
        ));
    }
    Ok(contents)
}

/// Write `contents` to `path`, creating or truncating it.
pub fn debug_write_entire_file(path: &Path, contents: &[u8]) -> bool {
    let result = fs::File::create(path).and_then(|mut file| {
        file.write_all(contents)?;
        file.flush()
    });

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}

/// Release a buffer returned by [`debug_read_entire_file`]
pub fn debug_free_file_memory(result: ReadFileResult) {
    drop(result);
}
