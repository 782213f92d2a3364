//! Configuration for rate limiter behavior

use std::time::Duration;
use tiercache_core::DEFAULT_MIN_INTERVAL;

/// Configuration for a [`RateLimiter`](super::RateLimiter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Name used in log events
    pub name: String,
    /// Minimum wall-clock time between the starts of two units of work
    pub min_interval: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            name: "rate-limiter".to_string(),
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl RateLimiterConfig {
    /// Config matching the public Nominatim usage policy
    pub fn for_nominatim() -> Self {
        Self {
            name: "nominatim".to_string(),
            min_interval: Duration::from_secs(1),
        }
    }

    /// Set the limiter name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the minimum interval between starts
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }
}
