//! Per-collection theme cache.
//!
//! Records are keyed by canonical collection path and carry the
//! [`CollectionSignature`](aether_models::CollectionSignature) of the state
//! they were computed from. A lookup rescans the directory and reuses the
//! stored record only while the signature still matches.
//!
//! Computation is single-flight per path: concurrent lookups for the same
//! collection queue on one async mutex and re-check the store once they hold
//! it, so only the first caller runs the pipeline. Different collections
//! never contend.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use aether_models::ThemeRecord;
use aether_store::ThemeStore;
use aether_vision::{scan_collection, CollectionScan, VisionError};
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::metrics;
use crate::pipeline::{CollectionAnalyzer, ThemeAnalyzer};

/// Options for a single lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Images to sample; the configured default when `None`.
    pub sample_size: Option<usize>,
    /// Recompute even if the stored record is current.
    pub force_refresh: bool,
}

/// A theme record and how it was obtained.
#[derive(Debug, Clone)]
pub struct ThemeLookup {
    pub record: ThemeRecord,
    pub cache_hit: bool,
    /// Wall time of this lookup, including any wait on another caller.
    pub elapsed_ms: u64,
}

pub struct ThemeCache {
    store: Arc<dyn ThemeStore>,
    analyzer: Arc<dyn ThemeAnalyzer>,
    config: EngineConfig,
    inflight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ThemeCache {
    pub fn new(store: Arc<dyn ThemeStore>, analyzer: Arc<dyn ThemeAnalyzer>, config: EngineConfig) -> Self {
        Self {
            store,
            analyzer,
            config,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Cache backed by the production [`CollectionAnalyzer`].
    pub fn with_default_analyzer(store: Arc<dyn ThemeStore>, config: EngineConfig) -> Self {
        let analyzer = Arc::new(CollectionAnalyzer::new(&config));
        Self::new(store, analyzer, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ThemeStore> {
        &self.store
    }

    /// Stored record if current, otherwise a fresh one.
    pub async fn get_or_compute(&self, path: &Path) -> EngineResult<ThemeLookup> {
        self.lookup(path, LookupOptions::default()).await
    }

    /// Recompute regardless of the stored signature.
    pub async fn refresh(&self, path: &Path, sample_size: Option<usize>) -> EngineResult<ThemeLookup> {
        self.lookup(
            path,
            LookupOptions {
                sample_size,
                force_refresh: true,
            },
        )
        .await
    }

    /// Stored record without any computation; possibly stale.
    pub async fn current(&self, path: &Path) -> EngineResult<Option<ThemeRecord>> {
        let key = match tokio::fs::canonicalize(path).await {
            Ok(root) => cache_key(&root),
            Err(_) => return Ok(None),
        };
        Ok(self.store.get(&key).await?)
    }

    pub async fn lookup(&self, path: &Path, options: LookupOptions) -> EngineResult<ThemeLookup> {
        let started = Instant::now();
        let scan = self.scan(path).await?;
        if scan.is_empty() {
            return Err(VisionError::EmptyCollection(scan.root).into());
        }
        let key = cache_key(&scan.root);

        if !options.force_refresh {
            if let Some(record) = self.fresh_record(&key, &scan).await? {
                return Ok(hit(record, started));
            }
        }

        let _slot = self.acquire_slot(&key).await;

        // Someone may have finished the same work while we waited.
        if !options.force_refresh {
            if let Some(record) = self.fresh_record(&key, &scan).await? {
                debug!(collection = %key, "Theme computed by a concurrent lookup");
                return Ok(hit(record, started));
            }
        }

        let reason = if options.force_refresh { "forced" } else { "stale" };
        metrics::record_cache_miss(reason);

        let sample_size = self.config.effective_sample_size(options.sample_size);
        let analysis_started = Instant::now();
        let outcome = match self.analyzer.analyze(&scan, sample_size).await {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::record_analysis("error", analysis_started.elapsed().as_secs_f64());
                warn!(collection = %key, error = %e, "Theme analysis failed, keeping stored record");
                return Err(e);
            }
        };
        metrics::record_analysis("ok", analysis_started.elapsed().as_secs_f64());

        let mut profile = outcome.profile.with_signature(scan.signature);
        profile.analyzed_at = Utc::now();
        let record = ThemeRecord::new(profile, outcome.summary);
        self.store.put(&key, record.clone()).await?;

        info!(
            collection = %key,
            theme = %record.profile.theme_name,
            confidence = record.profile.confidence,
            signature = %scan.signature,
            "Theme stored"
        );

        Ok(ThemeLookup {
            record,
            cache_hit: false,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn scan(&self, path: &Path) -> EngineResult<CollectionScan> {
        let path = path.to_path_buf();
        let sampler = self.config.sampler_config();
        let scan = tokio::task::spawn_blocking(move || scan_collection(&path, &sampler)).await??;
        Ok(scan)
    }

    async fn fresh_record(&self, key: &str, scan: &CollectionScan) -> EngineResult<Option<ThemeRecord>> {
        match self.store.get(key).await? {
            Some(record) if record.signature() == scan.signature => Ok(Some(record)),
            Some(record) => {
                debug!(
                    collection = %key,
                    stored = %record.signature(),
                    current = %scan.signature,
                    "Stored theme is stale"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn acquire_slot(&self, key: &str) -> InflightSlot<'_> {
        let slot = {
            let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            inflight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        let guard = slot.clone().lock_owned().await;
        InflightSlot {
            cache: self,
            key: key.to_string(),
            slot,
            guard: Some(guard),
        }
    }

    /// Number of collections with a lookup in progress or queued.
    pub fn inflight_count(&self) -> usize {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn cache_key(root: &Path) -> String {
    root.display().to_string()
}

fn hit(record: ThemeRecord, started: Instant) -> ThemeLookup {
    metrics::record_cache_hit();
    ThemeLookup {
        record,
        cache_hit: true,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

/// Held while computing a collection; removes the per-path mutex from the
/// map once no other caller references it.
struct InflightSlot<'a> {
    cache: &'a ThemeCache,
    key: String,
    slot: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut inflight = self.cache.inflight.lock().unwrap_or_else(|e| e.into_inner());
        // map + this slot
        if Arc::strong_count(&self.slot) <= 2 {
            inflight.remove(&self.key);
        }
    }
}

impl std::fmt::Debug for ThemeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCache")
            .field("config", &self.config)
            .field("inflight", &self.inflight_count())
            .finish()
    }
}

