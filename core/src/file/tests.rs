//! Tests for the debug file services

use tempfile::TempDir;

use super::*;

#[test]
fn test_write_then_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.bin");

    assert!(debug_write_entire_file(&path, b"everyday"));
    let result = debug_read_entire_file(&path);
    assert_eq!(result.contents, b"everyday");
    assert_eq!(result.contents_size(), 8);
    assert!(!result.is_empty());

    debug_free_file_memory(result);
}

#[test]
fn test_write_truncates_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.bin");

    assert!(debug_write_entire_file(&path, b"a much longer payload"));
    assert!(debug_write_entire_file(&path, b"short"));
    assert_eq!(debug_read_entire_file(&path).contents, b"short");
}

#[test]
fn test_read_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let result = debug_read_entire_file(&dir.path().join("missing.bin"));
    assert!(result.is_empty());
    assert_eq!(result.contents_size(), 0);
}

#[test]
fn test_read_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(debug_read_entire_file(dir.path()).is_empty());
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("state.bin");
    assert!(!debug_write_entire_file(&path, b"data"));
}

#[test]
fn test_empty_file_reads_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.bin");
    assert!(debug_write_entire_file(&path, &[]));
    assert!(debug_read_entire_file(&path).is_empty());
}

#[test]
fn test_platform_api_dispatches_to_services() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("api.bin");
    let api = PlatformApi::default();

    assert!((api.write_entire_file)(&path, &[1, 2, 3]));
    let result = (api.read_entire_file)(&path);
    assert_eq!(result.contents, vec![1, 2, 3]);
    (api.free_file_memory)(result);
}
