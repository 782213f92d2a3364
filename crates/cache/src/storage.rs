//! Persistent tier adapters
//!
//! The persistent tier is any synchronous string key/value medium that can
//! refuse writes when full. Two adapters ship with the crate:
//!
//! - [`MemoryStore`]: an in-process map with a byte quota, behaving like a
//!   browser storage area. Useful for tests and for embedding.
//! - [`FileStore`]: one file per key under a directory, written atomically.

mod file;
mod memory;


pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Failure reported by a persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("quota exceeded writing '{key}': {requested} bytes requested, {available} available")]
    QuotaExceeded {
        key: String,
        requested: u64,
        available: u64,
    },

    #[error("I/O failure during {operation} for '{key}': {source}")]
    Io {
        key: String,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// A string key/value medium backing the persistent tier
///
/// Implementations must treat removing an absent key as success.
pub trait PersistentStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Bytes a record occupies against a quota
pub(crate) fn record_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
