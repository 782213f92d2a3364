//! LRU (Least Recently Used) eviction policy implementation

use crate::eviction::traits::{EvictionCandidate, EvictionPolicy};
use chrono::{DateTime, Utc};

/// LRU (Least Recently Used) eviction policy
///
/// Oldest `last_accessed_at` loses; ties go to the oldest `created_at`, then
/// to the earliest access order.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl LruPolicy {
    pub fn new() -> Self {
        Self
    }
}

pub(super) fn recency(candidate: &EvictionCandidate<'_>) -> (DateTime<Utc>, DateTime<Utc>, u64) {
    (
        candidate.last_accessed_at,
        candidate.created_at,
        candidate.access_tick,
    )
}

impl EvictionPolicy for LruPolicy {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn select_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str> {
        candidates
            .iter()
            .filter(|candidate| candidate.is_evictable())
            .min_by_key(|candidate| recency(candidate))
            .map(|candidate| candidate.key)
    }
}
