//! Boot image probing.
//!
//! Kernels call this at instantiation time; the resolver only requires the path to be
//! non-empty.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::SimError;

/// A boot image that exists and can be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootImage {
    /// Path the image was found at.
    pub path: PathBuf,
    /// Image size in bytes.
    pub size: u64,
}

/// Checks that `path` names a non-empty regular file.
///
/// # Errors
///
/// Returns [`SimError::InstantiationFailure`] if the file is missing, unreadable,
/// not a regular file, or empty.
pub fn probe_boot_image(path: &Path) -> Result<BootImage, SimError> {
    let meta = fs::metadata(path).map_err(|e| {
        SimError::InstantiationFailure(format!(
            "could not read boot image '{}': {e}",
            path.display()
        ))
    })?;

    if !meta.is_file() {
        return Err(SimError::InstantiationFailure(format!(
            "boot image '{}' is not a regular file",
            path.display()
        )));
    }
    if meta.len() == 0 {
        return Err(SimError::InstantiationFailure(format!(
            "boot image '{}' is empty",
            path.display()
        )));
    }

    Ok(BootImage {
        path: path.to_path_buf(),
        size: meta.len(),
    })
}
