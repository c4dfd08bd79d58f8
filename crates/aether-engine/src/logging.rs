//! Structured analysis logging.
//!
//! Every log line emitted through [`AnalysisLogger`] carries the same
//! `analysis_id` and `collection` fields, so one analysis can be followed
//! across the sampler, the worker pool and the cache.

use std::path::Path;

use tracing::{error, info, warn, Span};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    analysis_id: String,
    collection: String,
}

impl AnalysisLogger {
    /// Create a logger with a fresh analysis ID.
    pub fn new(collection: &Path) -> Self {
        Self {
            analysis_id: Uuid::new_v4().to_string(),
            collection: collection.display().to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            collection = %self.collection,
            "Analysis started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            collection = %self.collection,
            "Analysis progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            analysis_id = %self.analysis_id,
            collection = %self.collection,
            "Analysis warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            analysis_id = %self.analysis_id,
            collection = %self.collection,
            "Analysis error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            analysis_id = %self.analysis_id,
            collection = %self.collection,
            "Analysis completed: {}", message
        );
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Span to attach per-image work to.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            analysis_id = %self.analysis_id,
            collection = %self.collection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_fields() {
        let logger = AnalysisLogger::new(Path::new("/art/gallery"));
        assert_eq!(logger.collection(), "/art/gallery");
        assert!(Uuid::parse_str(logger.analysis_id()).is_ok());
    }

    #[test]
    fn test_each_logger_gets_its_own_id() {
        let a = AnalysisLogger::new(Path::new("/art"));
        let b = AnalysisLogger::new(Path::new("/art"));
        assert_ne!(a.analysis_id(), b.analysis_id());
    }
}
