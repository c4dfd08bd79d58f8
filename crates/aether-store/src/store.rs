//! The theme store abstraction.

use aether_models::ThemeRecord;
use async_trait::async_trait;

use crate::error::StoreResult;

/// Keyed storage for the latest theme record of each collection.
///
/// Keys are canonical collection paths. `put` replaces any previous record
/// for the key in one step; readers see either the old or the new record,
/// never a mix.
#[async_trait]
pub trait ThemeStore: Send + Sync {
    /// Latest record for a collection, if any.
    async fn get(&self, key: &str) -> StoreResult<Option<ThemeRecord>>;

    /// Store `record` as the latest for `key`.
    async fn put(&self, key: &str, record: ThemeRecord) -> StoreResult<()>;

    /// All stored collections with their records, sorted by key.
    async fn list(&self) -> StoreResult<Vec<(String, ThemeRecord)>>;

    /// Number of stored collections.
    async fn len(&self) -> StoreResult<usize> {
        Ok(self.list().await?.len())
    }
}
