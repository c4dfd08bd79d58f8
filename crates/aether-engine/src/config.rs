//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use aether_vision::{SamplerConfig, DEFAULT_MAX_FILE_BYTES};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Collection analysed when a request names none
    pub collection_path: PathBuf,
    /// JSON document holding cached theme records
    pub cache_file: PathBuf,
    /// Images sampled per analysis when a request names no size
    pub default_sample_size: usize,
    /// Upper bound on a requested sample size
    pub max_sample_size: usize,
    /// Per-image extraction timeout
    pub image_timeout: Duration,
    /// Maximum images analysed in parallel
    pub max_parallel_images: usize,
    /// Files larger than this are skipped by the sampler
    pub max_image_bytes: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collection_path: PathBuf::from("images"),
            cache_file: PathBuf::from("config/theme_cache.json"),
            default_sample_size: 5,
            max_sample_size: 50,
            image_timeout: Duration::from_secs(10),
            max_parallel_images: available_cores(),
            max_image_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            collection_path: std::env::var("THEME_COLLECTION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.collection_path),
            cache_file: std::env::var("THEME_CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            default_sample_size: std::env::var("THEME_SAMPLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.default_sample_size),
            max_sample_size: std::env::var("THEME_MAX_SAMPLE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_sample_size),
            image_timeout: Duration::from_secs(
                std::env::var("THEME_IMAGE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            max_parallel_images: std::env::var("THEME_MAX_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_parallel_images),
            max_image_bytes: std::env::var("THEME_MAX_IMAGE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_image_bytes),
        }
    }

    /// Clamp a requested sample size into `1..=max_sample_size`.
    pub fn effective_sample_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_sample_size)
            .clamp(1, self.max_sample_size.max(1))
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            max_file_bytes: self.max_image_bytes,
        }
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_sample_size, 5);
        assert_eq!(config.max_sample_size, 50);
        assert_eq!(config.image_timeout, Duration::from_secs(10));
        assert!(config.max_parallel_images >= 1);
        assert_eq!(config.cache_file, PathBuf::from("config/theme_cache.json"));
    }

    #[test]
    fn test_effective_sample_size() {
        let config = EngineConfig::default();
        assert_eq!(config.effective_sample_size(None), 5);
        assert_eq!(config.effective_sample_size(Some(0)), 1);
        assert_eq!(config.effective_sample_size(Some(12)), 12);
        assert_eq!(config.effective_sample_size(Some(500)), 50);
    }
}
