//! Collection analysis pipeline.
//!
//! Sample → per-image {extract → classify mood} on the blocking pool →
//! aggregate → classify theme.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use aether_models::{AnalysisSummary, ImageFeatures, MoodResult, ThemeProfile};
use aether_vision::{
    aggregate, classify_mood, classify_theme, extract_from_path, recommended_display_duration,
    CollectionScan, VisionError,
};
use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, Instrument};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::logging::AnalysisLogger;
use crate::metrics;

/// Everything known about one analysed image.
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub path: PathBuf,
    pub features: ImageFeatures,
    pub mood: MoodResult,
    /// Seconds the display layer should keep the image on screen.
    pub display_duration: f32,
}

/// Result of analysing one sample of a collection.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Profile with an empty signature; the cache stamps it.
    pub profile: ThemeProfile,
    pub summary: AnalysisSummary,
}

/// Turns a scanned collection into a theme profile.
#[async_trait]
pub trait ThemeAnalyzer: Send + Sync {
    async fn analyze(&self, scan: &CollectionScan, sample_size: usize) -> EngineResult<AnalysisOutcome>;
}

/// Analyse one image off the async runtime, bounded by `timeout`.
///
/// A timed-out extraction keeps running on its blocking thread until it
/// finishes; only its result is discarded.
pub async fn analyze_image(path: &Path, timeout: Duration) -> EngineResult<ImageAnalysis> {
    run_blocking_analysis(path, timeout, None).await
}

/// `permit`, when given, moves onto the blocking thread and is released
/// only when the extraction actually ends, even after a timeout.
async fn run_blocking_analysis(
    path: &Path,
    timeout: Duration,
    permit: Option<OwnedSemaphorePermit>,
) -> EngineResult<ImageAnalysis> {
    let owned = path.to_path_buf();
    let task = tokio::task::spawn_blocking(move || -> Result<ImageAnalysis, VisionError> {
        let _permit = permit;
        let features = extract_from_path(&owned)?;
        let mood = classify_mood(&features);
        let display_duration = recommended_display_duration(&features);
        Ok(ImageAnalysis {
            path: owned,
            features,
            mood,
            display_duration,
        })
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(EngineError::timeout(path, timeout.as_secs())),
    }
}

/// The production analyzer: a bounded pool of blocking extractions.
#[derive(Debug, Clone)]
pub struct CollectionAnalyzer {
    semaphore: Arc<Semaphore>,
    image_timeout: Duration,
}

impl CollectionAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.max_parallel_images.max(1))),
            image_timeout: config.image_timeout,
        }
    }

    async fn analyze_permitted(&self, path: &Path) -> EngineResult<ImageAnalysis> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| EngineError::internal("Failed to acquire analysis permit"))?;
        run_blocking_analysis(path, self.image_timeout, Some(permit)).await
    }
}

#[async_trait]
impl ThemeAnalyzer for CollectionAnalyzer {
    async fn analyze(&self, scan: &CollectionScan, sample_size: usize) -> EngineResult<AnalysisOutcome> {
        let started = Instant::now();
        let logger = AnalysisLogger::new(&scan.root);
        let sample = scan.sample(sample_size)?;
        logger.log_start(&format!("{} of {} images sampled", sample.len(), scan.len()));

        let span = logger.create_span();
        let futures: Vec<_> = sample
            .iter()
            .map(|path| self.analyze_permitted(path).instrument(span.clone()))
            .collect();
        let results = join_all(futures).await;

        let mut analysed = Vec::with_capacity(results.len());
        let mut failed = 0u32;
        for (path, result) in sample.iter().zip(results) {
            match result {
                Ok(image) => {
                    debug!(
                        analysis_id = %logger.analysis_id(),
                        image = %path.display(),
                        mood = %image.mood.primary_mood,
                        "Image analysed"
                    );
                    analysed.push((image.features, image.mood));
                }
                Err(e) => {
                    failed += 1;
                    logger.log_warning(&format!("skipping {}: {}", path.display(), e));
                }
            }
        }

        let analyzed_count = analysed.len() as u32;
        metrics::record_images(analyzed_count, failed);

        if analysed.is_empty() {
            logger.log_error("no image in the sample could be analysed");
            return Err(VisionError::InsufficientSample.into());
        }

        let stats = aggregate(&analysed)?;
        let profile = classify_theme(&stats);
        let summary = AnalysisSummary {
            total_images: scan.len() as u64,
            analyzed_count,
            failed_count: failed,
            processing_ms: started.elapsed().as_millis() as u64,
        };

        logger.log_completion(&format!(
            "theme {} (confidence {:.2}), {} analysed, {} failed in {}ms",
            profile.theme_name, profile.confidence, analyzed_count, failed, summary.processing_ms
        ));

        Ok(AnalysisOutcome { profile, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_models::ThemeName;
    use aether_vision::{scan_collection, SamplerConfig};
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        let mut img = RgbImage::from_pixel(32, 32, Rgb(color));
        // a few stripes so edges and texture are not all zero
        for x in (0..32).step_by(8) {
            for y in 0..32 {
                img.put_pixel(x, y, Rgb([color[0] / 2, color[1] / 2, color[2] / 2]));
            }
        }
        img.save(&path).unwrap();
        path
    }

    fn config() -> EngineConfig {
        EngineConfig {
            max_parallel_images: 2,
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_image_reports_features_and_mood() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "magenta.png", [255, 0, 255]);

        let image = analyze_image(&path, Duration::from_secs(10)).await.unwrap();
        assert_eq!(image.features.width, 32);
        assert!((0.0..=1.0).contains(&image.mood.confidence));
        assert!(image.display_duration >= 8.0 && image.display_duration <= 12.0);
    }

    #[tokio::test]
    async fn test_analyze_image_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let err = analyze_image(&path, Duration::from_secs(10)).await.unwrap_err();
        assert!(matches!(err, EngineError::Vision(ref v) if v.is_per_image()), "{err}");
    }

    #[tokio::test]
    async fn test_broken_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", [255, 0, 255]);
        write_png(dir.path(), "b.png", [150, 50, 200]);
        std::fs::write(dir.path().join("c.png"), b"garbage").unwrap();

        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();
        let outcome = CollectionAnalyzer::new(&config()).analyze(&scan, 10).await.unwrap();

        assert_eq!(outcome.summary.total_images, 3);
        assert_eq!(outcome.summary.analyzed_count, 2);
        assert_eq!(outcome.summary.failed_count, 1);
        assert_eq!(outcome.profile.sample_size, 2);
    }

    #[tokio::test]
    async fn test_all_broken_is_insufficient_sample() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"garbage").unwrap();
        std::fs::write(dir.path().join("b.png"), b"garbage").unwrap();

        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();
        let err = CollectionAnalyzer::new(&config()).analyze(&scan, 5).await.unwrap_err();
        assert!(matches!(err, EngineError::Vision(VisionError::InsufficientSample)));
    }

    #[tokio::test]
    async fn test_sample_size_bounds_the_run() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..6 {
            write_png(dir.path(), &format!("{i}.png"), [120, 120, 120]);
        }

        let scan = scan_collection(dir.path(), &SamplerConfig::default()).unwrap();
        let outcome = CollectionAnalyzer::new(&config()).analyze(&scan, 3).await.unwrap();
        assert_eq!(outcome.summary.analyzed_count, 3);
        assert_eq!(outcome.summary.total_images, 6);
        // flat grey is never a colored theme
        assert_eq!(outcome.profile.theme_name, ThemeName::Neutral);
    }

    fn write_large_png(dir: &Path) -> PathBuf {
        let path = dir.join("large.png");
        let img = RgbImage::from_fn(2400, 1800, |x, y| {
            Rgb([(x % 251) as u8, (y % 241) as u8, ((x ^ y) % 239) as u8])
        });
        img.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_analyze_image_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_large_png(dir.path());

        let err = analyze_image(&path, Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_timed_out_image_keeps_its_permit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_large_png(dir.path());
        let analyzer = CollectionAnalyzer {
            semaphore: Arc::new(Semaphore::new(1)),
            image_timeout: Duration::ZERO,
        };

        let err = analyzer.analyze_permitted(&path).await.unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }), "{err}");
        // the extraction is still decoding on its blocking thread
        assert_eq!(analyzer.semaphore.available_permits(), 0);

        let deadline = Instant::now() + Duration::from_secs(60);
        while analyzer.semaphore.available_permits() == 0 {
            assert!(Instant::now() < deadline, "permit never released");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(analyzer.semaphore.available_permits(), 1);
    }
}
