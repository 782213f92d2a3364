//! End-to-end cache behaviour through the public API

mod common;

use common::test_cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tempfile::TempDir;
use tiercache::{
    CacheConfig, CacheStore, FileStore, GetOptions, MemoryStore, PersistentStore, SetOptions, Tier,
};

const SEVEN_DAYS: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Place {
    name: String,
    country: String,
}

fn zocalo() -> Place {
    Place {
        name: "Zócalo".to_string(),
        country: "México".to_string(),
    }
}

#[test]
fn test_geo_entry_expires_after_seven_days() {
    let t = test_cache(CacheConfig::default());

    assert!(t.cache.set(
        "geo",
        "19.4326,-99.1332",
        &zocalo(),
        SetOptions::default().expires_in(SEVEN_DAYS),
    ));
    assert_eq!(
        t.cache.get::<Place>("geo", "19.4326,-99.1332", GetOptions::default()),
        Some(zocalo())
    );
    assert_eq!(t.cache.stats().hits, 1);

    t.clock.advance(SEVEN_DAYS);

    assert_eq!(
        t.cache.get::<Place>("geo", "19.4326,-99.1332", GetOptions::default()),
        None
    );
    let stats = t.cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.memory_entry_count, 0);
    assert_eq!(stats.persistent_entry_count, 0);
    assert!(!t.cache.contains("geo", "19.4326,-99.1332"));
    assert_eq!(t.store.get("tiercache:geo:19.4326,-99.1332").unwrap(), None);
}

#[test]
fn test_entry_is_live_until_the_instant_it_expires() {
    let t = test_cache(CacheConfig::default());
    t.cache.set("ns", "k", &1, SetOptions::default().expires_in(Duration::from_secs(60)));

    t.clock.advance(Duration::from_secs(59));
    assert_eq!(t.cache.get::<u32>("ns", "k", GetOptions::default()), Some(1));

    t.clock.advance(Duration::from_secs(1));
    assert_eq!(t.cache.get::<u32>("ns", "k", GetOptions::default()), None);
}

#[test]
fn test_least_recently_used_entry_is_evicted() {
    let t = test_cache(CacheConfig::default().with_max_entries(3));
    for key in ["a", "b", "c"] {
        t.cache.set("ns", key, key, SetOptions::default());
        t.clock.advance(Duration::from_secs(1));
    }
    t.cache.get::<String>("ns", "a", GetOptions::default());
    t.clock.advance(Duration::from_secs(1));

    t.cache.set("ns", "d", "d", SetOptions::default());

    assert!(!t.cache.contains("ns", "b"));
    for key in ["a", "c", "d"] {
        assert!(t.cache.contains("ns", key), "{key} should have survived");
    }
    let stats = t.cache.stats();
    assert_eq!(stats.evictions, 1);
    assert_eq!(stats.memory_entry_count, 3);
}

#[test]
fn test_critical_entries_are_never_evicted() {
    let t = test_cache(CacheConfig::default().with_max_entries(2));
    t.cache.set("ns", "x", &1, SetOptions::default().critical());
    t.cache.set("ns", "y", &2, SetOptions::default().critical());

    // Full of critical entries: the write still succeeds and nothing is evicted
    assert!(t.cache.set("ns", "z", &3, SetOptions::default()));

    assert!(t.cache.contains("ns", "x"));
    assert!(t.cache.contains("ns", "y"));
    assert!(t.cache.contains("ns", "z"));
    assert_eq!(t.cache.stats().evictions, 0);
}

#[test]
fn test_critical_ceiling_rejects_new_critical_entries() {
    let t = test_cache(
        CacheConfig::default()
            .with_max_entries(10)
            .with_max_critical_entries(1),
    );
    assert!(t.cache.set("ns", "x", &1, SetOptions::default().critical()));

    let err = t
        .cache
        .try_set("ns", "y", &2, SetOptions::default().critical())
        .unwrap_err();
    assert!(matches!(err, tiercache::CacheError::CapacityExceeded { .. }));
    assert!(t.cache.set("ns", "y", &2, SetOptions::default()));
}

#[test]
fn test_value_survives_memory_loss_and_is_promoted() {
    let t = test_cache(CacheConfig::default());
    t.cache.set("ns", "k", &zocalo(), SetOptions::default());

    assert_eq!(t.cache.clear_memory(), 1);
    assert_eq!(t.cache.stats().memory_entry_count, 0);

    assert_eq!(
        t.cache.get::<Place>("ns", "k", GetOptions::default()),
        Some(zocalo())
    );
    assert_eq!(t.cache.metadata("ns", "k").unwrap().tier, Tier::Both);
    assert_eq!(t.cache.stats().memory_entry_count, 1);
}

#[test]
fn test_memory_only_reads_skip_the_persistent_tier() {
    let t = test_cache(CacheConfig::default());
    t.cache.set("ns", "k", &1, SetOptions::default());
    t.cache.clear_memory();

    assert_eq!(t.cache.get::<u32>("ns", "k", GetOptions::memory_only()), None);
    assert_eq!(t.cache.get::<u32>("ns", "k", GetOptions::default()), Some(1));
}

#[test]
fn test_persistent_failure_keeps_value_in_memory() {
    let store = std::sync::Arc::new(MemoryStore::with_quota(64));
    let cache = CacheStore::builder()
        .persistent(store.clone())
        .build()
        .unwrap();
    let big = "x".repeat(500);

    assert!(!cache.set("ns", "big", &big, SetOptions::default()));
    assert_eq!(cache.get::<String>("ns", "big", GetOptions::default()), Some(big));
    assert_eq!(cache.metadata("ns", "big").unwrap().tier, Tier::Memory);
    assert!(cache.stats().errors >= 1);

    // Other keys keep working
    assert!(cache.set("ns", "small", &1, SetOptions::default().memory_only()));
    assert_eq!(cache.get::<u32>("ns", "small", GetOptions::default()), Some(1));
}

#[test]
fn test_remove_and_clear_are_idempotent() {
    let t = test_cache(CacheConfig::default());
    t.cache.set("ns", "k", &1, SetOptions::default());

    assert!(t.cache.remove("ns", "k"));
    assert!(!t.cache.remove("ns", "k"));

    // Removing an absent key leaves no trace in the counters
    let before = t.cache.stats();
    assert!(!t.cache.remove("ns", "never-set"));
    assert_eq!(t.cache.stats(), before);
    assert_eq!(before.removals, 1);

    t.cache.set("ns", "a", &1, SetOptions::default());
    t.cache.clear();
    t.cache.clear();

    let stats = t.cache.stats();
    assert_eq!(stats.memory_entry_count, 0);
    assert_eq!(stats.persistent_entry_count, 0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.writes, 0);
    assert_eq!(t.cache.get::<u32>("ns", "a", GetOptions::default()), None);
}

#[test]
fn test_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let store = std::sync::Arc::new(FileStore::open(dir.path()).unwrap());
        let cache = CacheStore::builder().persistent(store).build().unwrap();
        assert!(cache.set("geo", "52.5163,13.3777", &zocalo(), SetOptions::default()));
        assert!(cache.set("geo", "scratch", &1, SetOptions::default().memory_only()));
    }

    let store = std::sync::Arc::new(FileStore::open(dir.path()).unwrap());
    let cache = CacheStore::builder().persistent(store).build().unwrap();

    assert_eq!(cache.stats().persistent_entry_count, 1);
    assert_eq!(
        cache.get::<Place>("geo", "52.5163,13.3777", GetOptions::default()),
        Some(zocalo())
    );
    assert_eq!(cache.get::<u32>("geo", "scratch", GetOptions::default()), None);
}
