//! Cache configuration and validation

use crate::errors::{CacheError, Result};
use crate::eviction::create_eviction_policy;
use std::time::Duration;
use tiercache_core::{DEFAULT_EVICTION_POLICY, DEFAULT_MAX_ENTRIES, DEFAULT_STORAGE_PREFIX};

/// Configuration for a [`CacheStore`](crate::CacheStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Upper bound on distinct live entries across both tiers
    pub max_entries: usize,
    /// TTL applied when a write does not set one; `None` never expires
    pub default_ttl: Option<Duration>,
    /// `lru` or `lfu`
    pub eviction_policy: String,
    /// Prepended to every key written to the persistent store
    pub storage_prefix: String,
    /// Reject new critical entries once this many exist; `None` is unbounded
    pub max_critical_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: None,
            eviction_policy: DEFAULT_EVICTION_POLICY.to_string(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            max_critical_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn with_eviction_policy(mut self, policy: impl Into<String>) -> Self {
        self.eviction_policy = policy.into();
        self
    }

    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    pub fn with_max_critical_entries(mut self, limit: usize) -> Self {
        self.max_critical_entries = Some(limit);
        self
    }

    /// Check the configuration before a cache is built from it
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::configuration("max_entries must be at least 1"));
        }

        if self.default_ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(CacheError::configuration(
                "default_ttl must be positive; leave it unset for entries that never expire",
            ));
        }

        if self.storage_prefix.contains('\0') {
            return Err(CacheError::configuration(
                "storage_prefix cannot contain NUL bytes",
            ));
        }

        if let Some(limit) = self.max_critical_entries {
            if limit > self.max_entries {
                return Err(CacheError::configuration(format!(
                    "max_critical_entries ({limit}) cannot exceed max_entries ({})",
                    self.max_entries
                )));
            }
        }

        create_eviction_policy(&self.eviction_policy).map(|_| ())
    }

    /// Persistent store key for a combined `namespace:key`
    pub(crate) fn record_key(&self, combined: &str) -> String {
        format!("{}{combined}", self.storage_prefix)
    }

    /// Never collides with a record key, which always contains the separator
    pub(crate) fn index_key(&self) -> String {
        format!("{}{}", self.storage_prefix, crate::serialization::INDEX_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.eviction_policy, "lru");
        assert_eq!(config.storage_prefix, "tiercache:");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(CacheConfig::default().with_max_entries(0).validate().is_err());
        assert!(CacheConfig::default()
            .with_default_ttl(Duration::ZERO)
            .validate()
            .is_err());
        assert!(CacheConfig::default()
            .with_eviction_policy("fifo")
            .validate()
            .is_err());
        assert!(CacheConfig::default()
            .with_max_entries(2)
            .with_max_critical_entries(3)
            .validate()
            .is_err());
    }

    #[test]
    fn test_storage_keys() {
        let config = CacheConfig::default().with_storage_prefix("app:");
        assert_eq!(config.record_key("geo:1,2"), "app:geo:1,2");
        assert_eq!(config.index_key(), "app:__index__");
    }
}
