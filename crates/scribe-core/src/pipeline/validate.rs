//! Input validation before an image is opened.

use std::path::{Path, PathBuf};

use crate::config::LimitsConfig;
use crate::error::{OcrError, Result};

/// Check that `path` names a readable regular file within the size limit.
///
/// Returns the normalized path on success. Every failure is an
/// [`OcrError::Validation`].
pub fn validate_path(path: &str, limits: &LimitsConfig) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(OcrError::Validation("Image path cannot be empty".into()));
    }

    let normalized: PathBuf = Path::new(path).components().collect();

    if !normalized.exists() {
        return Err(OcrError::Validation(format!(
            "Image path does not exist: {path}"
        )));
    }

    let metadata = std::fs::metadata(&normalized).map_err(|e| {
        OcrError::Validation(format!("Cannot read metadata for {path}: {e}"))
    })?;
    if !metadata.is_file() {
        return Err(OcrError::Validation(format!(
            "Image path is not a file: {path}"
        )));
    }

    // Opening is the only portable readability check; the handle drops here.
    std::fs::File::open(&normalized)
        .map_err(|e| OcrError::Validation(format!("Image file is not readable: {path} ({e})")))?;

    let max_bytes = limits.max_file_size_mb.saturating_mul(1024 * 1024);
    if metadata.len() > max_bytes {
        return Err(OcrError::Validation(format!(
            "Image file too large: {path} ({}MB > {}MB)",
            metadata.len() / (1024 * 1024),
            limits.max_file_size_mb
        )));
    }

    Ok(normalized)
}
