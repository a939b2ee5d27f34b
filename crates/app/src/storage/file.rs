//! JSON file-backed key-value store.
//!
//! All keys live in one JSON object on disk. Every write rewrites the whole
//! document through a temporary file followed by a rename, so the target is
//! always either the complete old content or the complete new content.
//!
//! A document that does not parse fails reads, but writes and deletes replace
//! it, so clearing the session is always possible.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use super::{KeyValueStore, StorageError, StorageResult};

/// Durable [`KeyValueStore`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Creates a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the document as the base for a write, discarding it if corrupt.
    async fn load_for_write(&self) -> StorageResult<BTreeMap<String, String>> {
        match self.load().await {
            Err(StorageError::Corrupt(err)) => {
                warn!(path = %self.path.display(), error = %err, "Replacing corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_for_write().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(err)) => {
                warn!(path = %self.path.display(), error = %err, "Replacing corrupt session file");
                return self.save(&BTreeMap::new()).await;
            }
            Err(err) => return Err(err),
        };
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
