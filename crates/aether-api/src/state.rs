//! Application state.

use std::sync::Arc;

use aether_engine::{EngineConfig, ThemeCache};
use aether_store::{JsonFileThemeStore, StoreResult, ThemeStore};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub engine_config: Arc<EngineConfig>,
    pub cache: Arc<ThemeCache>,
}

impl AppState {
    /// Create state backed by the JSON theme store named in `engine_config`.
    pub async fn new(config: ApiConfig, engine_config: EngineConfig) -> StoreResult<Self> {
        let store = JsonFileThemeStore::open(&engine_config.cache_file).await?;
        Ok(Self::with_store(config, engine_config, Arc::new(store)))
    }

    /// Create state around an existing store.
    pub fn with_store(config: ApiConfig, engine_config: EngineConfig, store: Arc<dyn ThemeStore>) -> Self {
        let cache = ThemeCache::with_default_analyzer(store, engine_config.clone());
        Self {
            config,
            engine_config: Arc::new(engine_config),
            cache: Arc::new(cache),
        }
    }

    /// Create state around a prepared cache.
    pub fn with_cache(config: ApiConfig, cache: ThemeCache) -> Self {
        Self {
            config,
            engine_config: Arc::new(cache.config().clone()),
            cache: Arc::new(cache),
        }
    }
}
