//! Engine metrics.
//!
//! Recorded through the `metrics` facade; the API binary installs the
//! Prometheus recorder that exports them.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const THEME_CACHE_HITS_TOTAL: &str = "aether_theme_cache_hits_total";
    pub const THEME_CACHE_MISSES_TOTAL: &str = "aether_theme_cache_misses_total";
    pub const ANALYSES_TOTAL: &str = "aether_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "aether_analysis_duration_seconds";
    pub const IMAGES_ANALYZED_TOTAL: &str = "aether_images_analyzed_total";
    pub const IMAGES_FAILED_TOTAL: &str = "aether_images_failed_total";
}

pub fn record_cache_hit() {
    counter!(names::THEME_CACHE_HITS_TOTAL).increment(1);
}

pub fn record_cache_miss(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::THEME_CACHE_MISSES_TOTAL, &labels).increment(1);
}

/// Record a finished analysis run and its outcome (`"ok"` or `"error"`).
pub fn record_analysis(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_images(analyzed: u32, failed: u32) {
    counter!(names::IMAGES_ANALYZED_TOTAL).increment(analyzed as u64);
    counter!(names::IMAGES_FAILED_TOTAL).increment(failed as u64);
}
