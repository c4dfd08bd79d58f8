//! Engine error types.

use std::path::PathBuf;
use thiserror::Error;

use aether_store::StoreError;
use aether_vision::VisionError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Analysis of {} timed out after {secs}s", path.display())]
    Timeout { path: PathBuf, secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn timeout(path: impl Into<PathBuf>, secs: u64) -> Self {
        Self::Timeout {
            path: path.into(),
            secs,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if the error is about a collection the caller named.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::Vision(VisionError::CollectionNotFound(_))
                | EngineError::Vision(VisionError::EmptyCollection(_))
        )
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("analysis task failed: {}", e))
    }
}
