//! Unit tests for boot image probing.

use crate::common::harness::boot_image;
use rvfs_core::common::SimError;
use rvfs_core::sim::loader::probe_boot_image;
use std::path::Path;
use tempfile::{NamedTempFile, tempdir};

#[test]
fn test_probe_existing_image() {
    let file = boot_image(&[0x13, 0x00, 0x00, 0x00]);
    let image = probe_boot_image(file.path()).unwrap();
    assert_eq!(image.path, file.path());
    assert_eq!(image.size, 4);
}

#[test]
fn test_probe_missing_image() {
    let err = probe_boot_image(Path::new("/nonexistent/rvfs/bbl.bin")).unwrap_err();
    match err {
        SimError::InstantiationFailure(msg) => assert!(msg.contains("/nonexistent/rvfs/bbl.bin")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_probe_directory() {
    let dir = tempdir().unwrap();
    let err = probe_boot_image(dir.path()).unwrap_err();
    match err {
        SimError::InstantiationFailure(msg) => assert!(msg.contains("not a regular file")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_probe_empty_image() {
    let file = NamedTempFile::new().unwrap();
    let err = probe_boot_image(file.path()).unwrap_err();
    match err {
        SimError::InstantiationFailure(msg) => assert!(msg.contains("is empty")),
        other => panic!("unexpected error: {other:?}"),
    }
}
