//! Error types for image analysis.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for analysis operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while analysing images or collections.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Unreadable image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Collection not found: {}", .0.display())]
    CollectionNotFound(PathBuf),

    #[error("Collection has no qualifying images: {}", .0.display())]
    EmptyCollection(PathBuf),

    #[error("No image in the sample could be analysed")]
    InsufficientSample,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Create an unreadable image error.
    pub fn unreadable(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::UnreadableImage {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedFormat(what.into())
    }

    /// Errors that concern one image rather than the whole collection.
    pub fn is_per_image(&self) -> bool {
        matches!(
            self,
            VisionError::UnreadableImage { .. } | VisionError::UnsupportedFormat(_)
        )
    }
}
