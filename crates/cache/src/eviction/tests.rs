//! Tests for eviction policies

use super::*;
use crate::entry::Priority;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
}

fn candidate(key: &str, created: i64, accessed: i64, count: u64, tick: u64) -> EvictionCandidate<'_> {
    EvictionCandidate {
        key,
        priority: Priority::Normal,
        created_at: at(created),
        last_accessed_at: at(accessed),
        access_count: count,
        access_tick: tick,
    }
}

#[test]
fn test_lru_picks_least_recently_accessed() {
    let candidates = [
        candidate("a", 0, 30, 1, 3),
        candidate("b", 10, 10, 1, 1),
        candidate("c", 20, 20, 1, 2),
    ];
    assert_eq!(LruPolicy::new().select_victim(&candidates), Some("b"));
}

#[test]
fn test_lru_breaks_ties_by_creation_then_access_order() {
    let same_access = [candidate("late", 5, 10, 1, 1), candidate("early", 1, 10, 1, 2)];
    assert_eq!(LruPolicy::new().select_victim(&same_access), Some("early"));

    let identical_times = [candidate("second", 0, 0, 1, 7), candidate("first", 0, 0, 1, 3)];
    assert_eq!(LruPolicy::new().select_victim(&identical_times), Some("first"));
}

#[test]
fn test_critical_entries_are_never_selected() {
    let mut oldest = candidate("pinned", 0, 0, 0, 0);
    oldest.priority = Priority::Critical;
    let candidates = [oldest, candidate("normal", 50, 50, 9, 9)];

    assert_eq!(LruPolicy::new().select_victim(&candidates), Some("normal"));
    assert_eq!(LfuPolicy::new().select_victim(&candidates), Some("normal"));

    let only_critical = [oldest];
    assert_eq!(LruPolicy::new().select_victim(&only_critical), None);
    assert_eq!(LfuPolicy::new().select_victim(&only_critical), None);
    assert_eq!(LruPolicy::new().select_victim(&[]), None);
}

#[test]
fn test_lfu_prefers_fewest_accesses_then_recency() {
    let candidates = [
        candidate("hot", 0, 0, 10, 1),
        candidate("cold_recent", 0, 40, 1, 4),
        candidate("cold_old", 0, 20, 1, 2),
    ];
    assert_eq!(LfuPolicy::new().select_victim(&candidates), Some("cold_old"));
}

#[test]
fn test_factory() {
    assert_eq!(create_eviction_policy("lru").unwrap().name(), "lru");
    assert_eq!(create_eviction_policy("LFU").unwrap().name(), "lfu");

    let err = create_eviction_policy("arc").err().unwrap();
    assert!(matches!(
        err.recovery_hint(),
        crate::errors::RecoveryHint::UseDefault { value } if value == "lru"
    ));
}
