//! LFU (Least Frequently Used) eviction policy implementation

use super::lru::recency;
use crate::eviction::traits::{EvictionCandidate, EvictionPolicy};

/// LFU (Least Frequently Used) eviction policy
///
/// Lowest `access_count` loses; equal counts fall back to LRU ordering.
/// Entries loaded from the persistent tier start at zero accesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct LfuPolicy;

impl LfuPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl EvictionPolicy for LfuPolicy {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn select_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str> {
        candidates
            .iter()
            .filter(|candidate| candidate.is_evictable())
            .min_by_key(|candidate| (candidate.access_count, recency(candidate)))
            .map(|candidate| candidate.key)
    }
}
