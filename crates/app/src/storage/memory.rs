//! In-memory key-value store.
//!
//! Nothing survives the process. Used by tests (with failure injection) and by
//! hosts that deliberately run without a persisted session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{KeyValueStore, StorageError, StorageResult};

/// In-memory [`KeyValueStore`].
///
/// Clones share the same entries, so a test can keep a handle to inspect what
/// the session store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    failing_writes: usize,
    fail_deletes: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.lock().entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        store
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Makes only the next `count` calls to `set` fail.
    pub fn fail_next_writes(&self, count: usize) {
        self.lock().failing_writes = count;
    }

    /// Makes every subsequent `delete` fail (or succeed again).
    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    /// Synchronous peek at a stored value, bypassing failure injection.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(StorageError::Unavailable(format!("read of {key} refused")));
        }
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        if inner.failing_writes > 0 {
            inner.failing_writes -= 1;
            return Err(StorageError::Unavailable(format!("write of {key} refused")));
        }
        if inner.fail_writes {
            return Err(StorageError::Unavailable(format!("write of {key} refused")));
        }
        inner.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut inner = self.lock();
        if inner.fail_deletes {
            return Err(StorageError::Unavailable(format!("delete of {key} refused")));
        }
        inner.entries.remove(key);
        Ok(())
    }
}
