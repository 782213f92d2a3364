//! Persistent tier tests: promotion, coherence, and failure handling

use super::Fixture;
use crate::codec::testing::{BrokenCodec, XorCodec};
use crate::config::CacheConfig;
use crate::entry::{GetOptions, SetOptions, Tier};
use crate::storage::{MemoryStore, PersistentStore, StoreError};
use crate::CacheStore;
use std::sync::Arc;

#[test]
fn test_read_through_promotes_into_memory() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("geo", "k", "Berlin", SetOptions::default());

    assert_eq!(fx.cache.clear_memory(), 1);
    assert_eq!(fx.cache.stats().memory_entry_count, 0);
    assert_eq!(fx.cache.metadata("geo", "k").unwrap().tier, Tier::Persistent);

    assert_eq!(
        fx.cache.get::<String>("geo", "k", GetOptions::default()).as_deref(),
        Some("Berlin")
    );
    let stats = fx.cache.stats();
    assert_eq!(stats.memory_entry_count, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(fx.cache.metadata("geo", "k").unwrap().tier, Tier::Both);
}

#[test]
fn test_memory_only_read_skips_persistent_tier() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("ns", "k", &1, SetOptions::default());
    fx.cache.clear_memory();

    assert_eq!(fx.cache.get::<u32>("ns", "k", GetOptions::memory_only()), None);
    assert_eq!(fx.cache.get::<u32>("ns", "k", GetOptions::default()), Some(1));
}

#[test]
fn test_restart_reloads_persisted_entries() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("ns", "a", &1, SetOptions::default().with_metadata("origin", "test"));
    fx.cache.set("ns", "volatile", &2, SetOptions::default().memory_only());

    let restarted = fx.reopen(CacheConfig::default());
    let stats = restarted.stats();
    assert_eq!(stats.memory_entry_count, 0);
    assert_eq!(stats.persistent_entry_count, 1);

    assert_eq!(restarted.get::<u32>("ns", "a", GetOptions::default()), Some(1));
    assert_eq!(restarted.get::<u32>("ns", "volatile", GetOptions::default()), None);
    let metadata = restarted.metadata("ns", "a").unwrap();
    assert_eq!(metadata.metadata.get("origin").map(String::as_str), Some("test"));
}

#[test]
fn test_memory_only_write_drops_stale_persisted_copy() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("ns", "k", "old", SetOptions::default());
    fx.cache.set("ns", "k", "new", SetOptions::default().memory_only());

    assert!(fx.record("ns:k").is_none());
    assert_eq!(
        fx.cache.get::<String>("ns", "k", GetOptions::default()).as_deref(),
        Some("new")
    );

    let restarted = fx.reopen(CacheConfig::default());
    assert_eq!(restarted.get::<String>("ns", "k", GetOptions::default()), None);
}

#[test]
fn test_persistent_write_failure_keeps_memory_copy() {
    let fx = Fixture::with_store(CacheConfig::default(), Arc::new(MemoryStore::with_quota(64)));
    let large = "x".repeat(200);

    assert!(!fx.cache.set("ns", "big", &large, SetOptions::default()));
    assert_eq!(
        fx.cache.get::<String>("ns", "big", GetOptions::default()),
        Some(large.clone())
    );
    assert_eq!(fx.cache.metadata("ns", "big").unwrap().tier, Tier::Memory);
    assert!(fx.record("ns:big").is_none());

    let err = fx
        .cache
        .try_set("ns", "big", &large, SetOptions::default())
        .unwrap_err();
    assert!(err.is_quota_exceeded());
    assert_eq!(fx.cache.stats().errors, 2);
}

#[test]
fn test_failed_overwrite_removes_older_persisted_copy() {
    let fx = Fixture::with_store(CacheConfig::default(), Arc::new(MemoryStore::with_quota(1000)));
    assert!(fx.cache.set("ns", "k", "small", SetOptions::default()));
    assert!(fx.record("ns:k").is_some());

    assert!(!fx.cache.set("ns", "k", &"y".repeat(2000), SetOptions::default()));
    assert!(fx.record("ns:k").is_none());

    // After a restart the stale value must not come back
    let restarted = fx.reopen(CacheConfig::default());
    assert_eq!(restarted.get::<String>("ns", "k", GetOptions::default()), None);
}

#[test]
fn test_encrypted_entries_are_opaque_at_rest() {
    let store = Arc::new(MemoryStore::new());
    let cache = CacheStore::builder()
        .persistent(store.clone())
        .codec(Arc::new(XorCodec(0x42)))
        .build()
        .unwrap();

    assert!(cache.set("auth", "token", "secret-token", SetOptions::default().encrypted()));

    let raw = store.get("tiercache:auth:token").unwrap().unwrap();
    assert!(!raw.contains("secret-token"));
    assert!(raw.contains("\"encrypted\""));

    cache.clear_memory();
    assert_eq!(
        cache.get::<String>("auth", "token", GetOptions::default()).as_deref(),
        Some("secret-token")
    );
    assert!(cache.metadata("auth", "token").unwrap().encrypted);
}

#[test]
fn test_encryption_without_codec_fails_the_write() {
    let fx = Fixture::new(CacheConfig::default());

    assert!(!fx.cache.set("auth", "token", "secret", SetOptions::default().encrypted()));
    assert!(fx.record("auth:token").is_none());
    assert_eq!(
        fx.cache.get::<String>("auth", "token", GetOptions::default()).as_deref(),
        Some("secret")
    );
}

#[test]
fn test_undecryptable_entry_is_purged() {
    let store = Arc::new(MemoryStore::new());
    let writer = CacheStore::builder()
        .persistent(store.clone())
        .codec(Arc::new(XorCodec(7)))
        .build()
        .unwrap();
    writer.set("auth", "token", "secret", SetOptions::default().encrypted());

    let reader = CacheStore::builder()
        .persistent(store.clone())
        .codec(Arc::new(BrokenCodec))
        .build()
        .unwrap();
    let err = reader
        .try_get::<String>("auth", "token", GetOptions::default())
        .unwrap_err();
    assert!(matches!(err, crate::CacheError::Codec { .. }));

    assert!(store.get("tiercache:auth:token").unwrap().is_none());
    assert!(!reader.contains("auth", "token"));
    let stats = reader.stats();
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_corrupt_record_is_purged() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("ns", "k", &1, SetOptions::default());
    fx.cache.clear_memory();
    fx.store
        .set("tiercache:ns:k", "{ definitely not json".to_string())
        .unwrap();

    let err = fx
        .cache
        .try_get::<u32>("ns", "k", GetOptions::default())
        .unwrap_err();
    assert!(err.is_corruption());
    assert!(fx.record("ns:k").is_none());
    assert!(!fx.cache.contains("ns", "k"));
    assert_eq!(fx.cache.get::<u32>("ns", "k", GetOptions::default()), None);
}

#[test]
fn test_corrupt_index_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store
        .set("tiercache:__index__", "{{{".to_string())
        .unwrap();

    let fx = Fixture::with_store(CacheConfig::default(), store);
    assert_eq!(fx.cache.stats().persistent_entry_count, 0);
    assert!(fx.cache.set("ns", "k", &1, SetOptions::default()));
}

#[test]
fn test_record_missing_from_index_is_adopted_on_read() {
    let fx = Fixture::new(CacheConfig::default());
    fx.cache.set("ns", "k", &1, SetOptions::default());
    fx.store
        .set("tiercache:__index__", "garbage".to_string())
        .unwrap();

    let restarted = fx.reopen(CacheConfig::default());
    assert_eq!(restarted.stats().persistent_entry_count, 0);
    assert_eq!(restarted.get::<u32>("ns", "k", GetOptions::default()), Some(1));
    assert_eq!(restarted.stats().persistent_entry_count, 1);
}

/// Store whose reads always fail
struct UnreadableStore;

impl PersistentStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io {
            key: key.to_string(),
            operation: "read".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "device not ready"),
        })
    }

    fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[test]
fn test_store_read_errors_become_misses() {
    let cache = CacheStore::builder()
        .persistent(Arc::new(UnreadableStore))
        .build()
        .unwrap();

    assert!(cache.set("ns", "k", &1, SetOptions::default()));
    cache.clear_memory();

    assert_eq!(cache.get::<u32>("ns", "k", GetOptions::default()), None);
    let err = cache
        .try_get::<u32>("ns", "k", GetOptions::default())
        .unwrap_err();
    assert!(err.is_transient());

    // Transient failures do not drop the entry
    assert!(cache.contains("ns", "k"));
    assert_eq!(cache.stats().errors, 2);
}
