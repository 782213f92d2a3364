//! Cached, paced reverse geocoding

use crate::address::Address;
use crate::config::GeoConfig;
use crate::coordinates::Coordinates;
use crate::geocoder::{GeocodeError, Geocoder};
use crate::quantizer::Quantizer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tiercache_cache::{CacheStore, GetOptions, SetOptions};
use tiercache_core::Result;
use tiercache_utils::{ExecuteError, RateLimiter};

/// Where a resolved address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Cache,
    Provider,
    /// No provider answer; the address only carries the coordinates
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub address: Address,
    pub source: ResolutionSource,
    /// Quantized cache key the lookup used
    pub key: String,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }
}

/// Reverse geocoder that answers from the cache when it can
///
/// Nearby points share one cache entry: coordinates are quantized to
/// [`GeoConfig::precision`] decimal places before lookup. Misses go to the
/// provider through the rate limiter, and only successful answers are cached.
#[derive(Clone)]
pub struct GeoResolver {
    cache: CacheStore,
    limiter: RateLimiter,
    geocoder: Arc<dyn Geocoder>,
    config: GeoConfig,
    quantizer: Quantizer,
}

impl GeoResolver {
    pub fn new(
        cache: CacheStore,
        limiter: RateLimiter,
        geocoder: Arc<dyn Geocoder>,
        config: GeoConfig,
    ) -> Result<Self> {
        config.validate()?;
        let quantizer = Quantizer::new(config.precision);
        Ok(Self {
            cache,
            limiter,
            geocoder,
            config,
            quantizer,
        })
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Resolve a point to an address
    ///
    /// Never fails: when the provider cannot answer, the result is a
    /// fallback address built from the coordinates, and nothing is cached so
    /// the next call asks the provider again.
    pub async fn resolve(&self, coordinates: Coordinates) -> Resolution {
        let key = self.quantizer.key(coordinates);

        if let Err(e) = coordinates.validate() {
            tracing::warn!(error = %e, "Refusing to geocode invalid coordinates");
            return Resolution {
                address: Address::fallback(coordinates),
                source: ResolutionSource::Fallback,
                key,
            };
        }

        if let Some(address) =
            self.cache
                .get::<Address>(&self.config.namespace, &key, GetOptions::default())
        {
            tracing::debug!(key = %key, "Geocode cache hit");
            return Resolution {
                address,
                source: ResolutionSource::Cache,
                key,
            };
        }

        let geocoder = Arc::clone(&self.geocoder);
        let outcome = self
            .limiter
            .execute(move || async move { geocoder.reverse(coordinates).await })
            .await;

        match outcome {
            Ok(address) => {
                self.store(&key, &address);
                Resolution {
                    address,
                    source: ResolutionSource::Provider,
                    key,
                }
            }
            Err(error) => {
                log_failure(&key, &error);
                Resolution {
                    address: Address::fallback(coordinates),
                    source: ResolutionSource::Fallback,
                    key,
                }
            }
        }
    }

    fn store(&self, key: &str, address: &Address) {
        let mut options = SetOptions::default()
            .expires_in(self.config.ttl)
            .priority(self.config.priority)
            .with_metadata("provider", self.geocoder.name());
        if self.config.encrypt {
            options = options.encrypted();
        }

        if !self.cache.set(&self.config.namespace, key, address, options) {
            tracing::warn!(key = %key, "Failed to cache geocode result");
        }
    }
}

fn log_failure(key: &str, error: &ExecuteError<GeocodeError>) {
    match error {
        ExecuteError::Failed(e) if e.is_transient() => {
            tracing::warn!(key = %key, error = %e, "Geocoding failed, will retry on next lookup")
        }
        ExecuteError::Failed(e) => {
            tracing::info!(key = %key, error = %e, "Geocoding returned no address")
        }
        other => tracing::warn!(key = %key, error = %other, "Geocoding request did not run"),
    }
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("geocoder", &self.geocoder.name())
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .finish()
    }
}
