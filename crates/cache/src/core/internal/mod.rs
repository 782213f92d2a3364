//! State shared by the cache operations

use crate::entry::{CacheEntry, Priority};
use crate::eviction::EvictionCandidate;
use crate::serialization::IndexEntry;
use crate::stats::TierSizes;
use std::collections::{BTreeMap, HashMap};

/// Both tiers as seen by this process, guarded by one lock
///
/// `persisted` mirrors the index record in the persistent store, so the
/// persistent tier can be counted and enumerated without reading it.
#[derive(Default)]
pub struct TierState {
    pub memory: HashMap<String, CacheEntry>,
    pub persisted: BTreeMap<String, IndexEntry>,
    pub access_tick: u64,
}

impl TierState {
    pub fn with_persisted(persisted: BTreeMap<String, IndexEntry>) -> Self {
        Self {
            persisted,
            ..Self::default()
        }
    }

    pub fn next_tick(&mut self) -> u64 {
        self.access_tick += 1;
        self.access_tick
    }

    pub fn contains(&self, combined: &str) -> bool {
        self.memory.contains_key(combined) || self.persisted.contains_key(combined)
    }

    /// Distinct entries across both tiers
    pub fn entry_count(&self) -> usize {
        self.memory.len()
            + self
                .persisted
                .keys()
                .filter(|key| !self.memory.contains_key(*key))
                .count()
    }

    pub fn critical_count(&self) -> usize {
        let in_memory = self
            .memory
            .values()
            .filter(|entry| entry.priority == Priority::Critical)
            .count();
        let persisted_only = self
            .persisted
            .iter()
            .filter(|(key, entry)| {
                entry.priority == Priority::Critical && !self.memory.contains_key(*key)
            })
            .count();
        in_memory + persisted_only
    }

    /// One candidate per distinct entry; the memory copy wins when both exist
    pub fn eviction_candidates(&self) -> Vec<EvictionCandidate<'_>> {
        let in_memory = self.memory.iter().map(|(key, entry)| EvictionCandidate {
            key: key.as_str(),
            priority: entry.priority,
            created_at: entry.created_at,
            last_accessed_at: entry.last_accessed_at,
            access_count: entry.access_count,
            access_tick: entry.access_tick,
        });
        let persisted_only = self
            .persisted
            .iter()
            .filter(|(key, _)| !self.memory.contains_key(*key))
            .map(|(key, entry)| EvictionCandidate {
                key: key.as_str(),
                priority: entry.priority,
                created_at: entry.created_at,
                last_accessed_at: entry.last_accessed_at,
                access_count: 0,
                access_tick: 0,
            });
        in_memory.chain(persisted_only).collect()
    }

    pub fn sizes(&self) -> TierSizes {
        let memory_bytes: u64 = self.memory.values().map(|entry| entry.size_bytes).sum();
        let persisted_only_bytes: u64 = self
            .persisted
            .iter()
            .filter(|(key, _)| !self.memory.contains_key(*key))
            .map(|(_, entry)| entry.size_bytes)
            .sum();

        TierSizes {
            memory_entries: self.memory.len(),
            persistent_entries: self.persisted.len(),
            bytes: memory_bytes + persisted_only_bytes,
        }
    }
}
