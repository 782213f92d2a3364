//! Two-tier expiring cache for tiercache
//!
//! This crate provides the [`CacheStore`]:
//! - A memory tier in front of an optional [`PersistentStore`]
//! - Write-through on `set`, read-through with promotion on `get`
//! - Per-entry TTL with lazy expiration and an optional background sweep
//! - Capacity bounded by entry count, with LRU or LFU eviction that never
//!   touches critical entries
//! - Optional encryption of persisted payloads through an [`EncryptionCodec`]
//!
//! ```
//! use tiercache_cache::{CacheConfig, CacheStore, GetOptions, MemoryStore, SetOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let cache = CacheStore::builder()
//!     .config(CacheConfig::default().with_max_entries(100))
//!     .persistent(Arc::new(MemoryStore::new()))
//!     .build()
//!     .unwrap();
//!
//! cache.set("user", "42", "Ada", SetOptions::default().expires_in(Duration::from_secs(60)));
//! let name: Option<String> = cache.get("user", "42", GetOptions::default());
//! assert_eq!(name.as_deref(), Some("Ada"));
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod entry;
pub mod errors;
pub mod eviction;
pub mod keys;
pub mod serialization;
pub mod stats;
pub mod storage;

pub use codec::{CodecError, EncryptionCodec};
pub use config::CacheConfig;
pub use self::core::{CacheStore, CacheStoreBuilder};
pub use entry::{CacheEntry, EntryMetadata, GetOptions, Priority, SetOptions, Tier};
pub use errors::{CacheError, RecoveryHint, Result, SerializationOp};
pub use eviction::{create_eviction_policy, EvictionCandidate, EvictionPolicy, LfuPolicy, LruPolicy};
pub use keys::CacheKey;
pub use stats::CacheStatistics;
pub use storage::{FileStore, MemoryStore, PersistentStore, StoreError};
