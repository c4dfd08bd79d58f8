#![deny(unreachable_patterns)]
//! Image analysis for content-driven theming.
//!
//! This crate provides:
//! - Per-image feature extraction (palette, temperature, tone, complexity)
//! - Mood and cinematic classification
//! - Collection scanning, signatures and random sampling
//! - Aggregation of per-image results into collection statistics
//! - Rule-based theme classification
//!
//! Everything here is synchronous and CPU-bound; callers decide how to
//! schedule it.

pub mod aggregate;
pub mod error;
pub mod features;
pub mod formats;
pub mod mood;
pub mod sampler;
pub mod theme;

pub use aggregate::{aggregate, PALETTE_MERGE_DISTANCE};
pub use error::{VisionError, VisionResult};
pub use features::{
    extract, extract_from_bytes, extract_from_path, recommended_display_duration, EDGE_WEIGHT,
    MAX_ANALYSIS_DIMENSION, PALETTE_SIZE, TEXTURE_WEIGHT,
};
pub use formats::{is_supported_path, SUPPORTED_EXTENSIONS};
pub use mood::classify as classify_mood;
pub use sampler::{sample, scan_collection, CollectionScan, SamplerConfig, DEFAULT_MAX_FILE_BYTES};
pub use theme::{classify_theme, RULES};
