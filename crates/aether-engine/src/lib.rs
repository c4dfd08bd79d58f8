//! Theme analysis engine.
//!
//! This crate provides:
//! - The async analysis pipeline (bounded blocking pool, per-image timeout)
//! - The per-collection theme cache with signature invalidation
//! - Engine configuration from the environment
//! - Structured analysis logging and metrics

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod theme_cache;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::AnalysisLogger;
pub use pipeline::{analyze_image, AnalysisOutcome, CollectionAnalyzer, ImageAnalysis, ThemeAnalyzer};
pub use theme_cache::{LookupOptions, ThemeCache, ThemeLookup};
