//! Cache entries and the options that shape them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Eviction priority of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Evictable when the cache is at capacity
    #[default]
    Normal,
    /// Never evicted for capacity; still subject to TTL, `remove` and `clear`
    Critical,
}

/// Where an entry lives, or which tiers an operation may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Memory,
    Persistent,
    #[default]
    Both,
}

impl Tier {
    /// Whether this tier selection allows touching the persistent store
    pub const fn includes_persistent(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Options for reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// `Tier::Memory` skips the persistent tier on a memory miss
    pub tier: Tier,
}

impl GetOptions {
    pub fn memory_only() -> Self {
        Self { tier: Tier::Memory }
    }
}

/// Options for writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Time to live; falls back to the configured default TTL
    pub expires_in: Option<Duration>,
    pub priority: Priority,
    /// `Tier::Memory` keeps the entry out of the persistent store
    pub tier: Tier,
    /// Encrypt the persisted copy with the configured codec
    pub encrypt: bool,
    pub metadata: BTreeMap<String, String>,
}

impl SetOptions {
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expires_in = Some(ttl);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn critical(self) -> Self {
        self.priority(Priority::Critical)
    }

    pub fn memory_only(mut self) -> Self {
        self.tier = Tier::Memory;
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.encrypt = true;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A cached value with its bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub namespace: String,
    pub key: String,
    pub value: Value,
    pub created_at: DateTime<Utc>,
    /// `None` never expires, but remains evictable
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub priority: Priority,
    pub metadata: BTreeMap<String, String>,
    pub tier: Tier,
    pub encrypted: bool,
    /// Combined key length plus serialized value length
    pub size_bytes: u64,
    /// Monotonic access order, breaks timestamp ties for recency
    pub(crate) access_tick: u64,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>, tick: u64) {
        self.last_accessed_at = now;
        self.access_count = self.access_count.saturating_add(1);
        self.access_tick = tick;
    }
}

pub(crate) fn is_expired_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|at| now >= at)
}

/// Everything about an entry except its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMetadata {
    pub namespace: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub priority: Priority,
    pub tier: Tier,
    pub encrypted: bool,
    pub size_bytes: u64,
    pub metadata: BTreeMap<String, String>,
}

impl From<&CacheEntry> for EntryMetadata {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            namespace: entry.namespace.clone(),
            key: entry.key.clone(),
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            last_accessed_at: entry.last_accessed_at,
            access_count: entry.access_count,
            priority: entry.priority,
            tier: entry.tier,
            encrypted: entry.encrypted,
            size_bytes: entry.size_bytes,
            metadata: entry.metadata.clone(),
        }
    }
}
