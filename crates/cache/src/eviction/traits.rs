//! Core eviction policy trait definition

use crate::entry::Priority;
use chrono::{DateTime, Utc};

/// What a policy gets to see about an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionCandidate<'a> {
    /// Combined `namespace:key`
    pub key: &'a str,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    /// Monotonic access order within this process; 0 when never touched
    pub access_tick: u64,
}

impl EvictionCandidate<'_> {
    pub fn is_evictable(&self) -> bool {
        self.priority != Priority::Critical
    }
}

/// Eviction policy trait
pub trait EvictionPolicy: Send + Sync {
    /// Name used in configuration
    fn name(&self) -> &'static str;

    /// Pick the entry to evict, or `None` when nothing is evictable
    fn select_victim<'a>(&self, candidates: &[EvictionCandidate<'a>]) -> Option<&'a str>;
}
