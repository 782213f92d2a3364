//! Geocoding cache configuration

use crate::quantizer::MAX_PRECISION;
use std::time::Duration;
use tiercache_cache::Priority;
use tiercache_core::{Error, Result, DEFAULT_GEO_NAMESPACE, DEFAULT_GEO_PRECISION, DEFAULT_GEO_TTL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoConfig {
    /// Cache namespace for resolved addresses
    pub namespace: String,
    /// Decimal places kept when quantizing coordinates
    pub precision: u32,
    /// How long a resolved address stays cached
    pub ttl: Duration,
    pub priority: Priority,
    /// Encrypt persisted addresses; needs a codec on the cache
    pub encrypt: bool,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_GEO_NAMESPACE.to_string(),
            precision: DEFAULT_GEO_PRECISION,
            ttl: DEFAULT_GEO_TTL,
            priority: Priority::Normal,
            encrypt: false,
        }
    }
}

impl GeoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::configuration(format!(
                "geo precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        if self.ttl.is_zero() {
            return Err(Error::configuration("geo ttl must be positive"));
        }
        if self.namespace.is_empty() || self.namespace.contains(':') {
            return Err(Error::configuration(format!(
                "geo namespace '{}' must be non-empty and cannot contain ':'",
                self.namespace
            )));
        }
        Ok(())
    }
}
