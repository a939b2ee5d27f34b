//! Durable key-value storage for session data.
//!
//! The session store persists exactly two values (the auth token and the
//! serialized user profile) so that a restart can restore the session. The
//! [`KeyValueStore`] trait is the seam to the platform's storage; this module
//! ships an in-memory implementation for tests and a JSON file implementation
//! for desktop and CLI use.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;

use thiserror::Error;

/// Errors that can occur when reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a valid key-value document.
    #[error("storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Async string-keyed durable storage.
///
/// Implementations must treat deleting an absent key as success and must make
/// a completed `set` visible to every subsequent `get`, including one made
/// after a process restart for durable backends.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error only for actual storage failures; a missing key is
    /// `Ok(None)`.
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Remove `key`.
    ///
    /// # Errors
    ///
    /// Returns `Ok(())` even if the key doesn't exist. Only returns an error
    /// for actual storage failures.
    fn delete(&self, key: &str) -> impl Future<Output = StorageResult<()>> + Send;
}
