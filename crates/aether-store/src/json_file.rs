//! JSON file backed theme store.
//!
//! All records live in one document:
//!
//! ```json
//! { "version": 1, "collections": { "/art/gallery": { "profile": {..}, "summary": {..} } } }
//! ```
//!
//! The document is loaded once on open and rewritten on every `put` by
//! writing a sibling `.tmp` file and renaming it over the original, so a
//! crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aether_models::ThemeRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::ThemeStore;

/// Version of the on-disk document. Documents with another version are
/// ignored and replaced on the next write.
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    collections: BTreeMap<String, ThemeRecord>,
}

#[derive(Debug)]
pub struct JsonFileThemeStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, ThemeRecord>>,
}

impl JsonFileThemeStore {
    /// Open the store at `path`, loading any existing document.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed,
    /// or was written by another format version, is treated the same way.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = load_document(&path).await?;
        info!(path = %path.display(), collections = records.len(), "Theme store opened");

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &BTreeMap<String, ThemeRecord>) -> StoreResult<()> {
        let document = StoreDocumentRef {
            version: STORE_FORMAT_VERSION,
            collections: records,
        };
        let json = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::write_failed(parent, e.to_string()))?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| StoreError::write_failed(&tmp, e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::write_failed(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), bytes = json.len(), "Theme store persisted");
        Ok(())
    }
}

#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    version: u32,
    collections: &'a BTreeMap<String, ThemeRecord>,
}

async fn load_document(path: &Path) -> StoreResult<BTreeMap<String, ThemeRecord>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No theme store file yet");
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice::<StoreDocument>(&bytes) {
        Ok(document) if document.version == STORE_FORMAT_VERSION => Ok(document.collections),
        Ok(document) => {
            debug!(
                stored_version = document.version,
                current_version = STORE_FORMAT_VERSION,
                "Theme store version mismatch, starting empty"
            );
            Ok(BTreeMap::new())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Theme store unreadable, starting empty");
            Ok(BTreeMap::new())
        }
    }
}

#[async_trait]
impl ThemeStore for JsonFileThemeStore {
    async fn get(&self, key: &str) -> StoreResult<Option<ThemeRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, record: ThemeRecord) -> StoreResult<()> {
        // Holding the write lock across the file write keeps the document
        // and the in-memory map in the same order of updates.
        let mut records = self.records.write().await;
        let previous = records.insert(key.to_string(), record);

        if let Err(e) = self.persist(&records).await {
            match previous {
                Some(previous) => records.insert(key.to_string(), previous),
                None => records.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<(String, ThemeRecord)>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.records.read().await.len())
    }
}
