//! In-memory theme store.

use std::collections::HashMap;
use std::sync::Arc;

use aether_models::ThemeRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::store::ThemeStore;

/// Process-local store. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    records: Arc<RwLock<HashMap<String, ThemeRecord>>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThemeStore for MemoryThemeStore {
    async fn get(&self, key: &str) -> StoreResult<Option<ThemeRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, record: ThemeRecord) -> StoreResult<()> {
        self.records.write().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<(String, ThemeRecord)>> {
        let records = self.records.read().await;
        let mut entries: Vec<_> = records.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.records.read().await.len())
    }
}
