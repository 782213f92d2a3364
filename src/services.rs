//! Composition root wiring the cache, the rate limiter and the resolver

use crate::settings::{Settings, SettingsLoader};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tiercache_cache::{CacheStore, FileStore, MemoryStore, PersistentStore};
use tiercache_core::{Error, Result};
use tiercache_geo::{GeoResolver, Geocoder, NominatimGeocoder};
use tiercache_utils::RateLimiter;

// Process-wide instance for applications that want one
static GLOBAL_SERVICES: OnceCell<Services> = OnceCell::new();

/// The shared components an application needs, built from [`Settings`]
///
/// Cloning is cheap; every component shares its state with the clones.
#[derive(Debug, Clone)]
pub struct Services {
    settings: Settings,
    cache: CacheStore,
    limiter: RateLimiter,
    resolver: GeoResolver,
}

impl Services {
    /// Load settings and build services talking to Nominatim
    pub fn load() -> Result<Self> {
        Self::from_settings(SettingsLoader::load()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(settings.nominatim.clone())
            .map_err(|e| Error::configuration(e.to_string()))?;
        Self::with_geocoder(settings, Arc::new(geocoder))
    }

    /// Build services around a custom geocoder
    pub fn with_geocoder(settings: Settings, geocoder: Arc<dyn Geocoder>) -> Result<Self> {
        settings.validate()?;

        let store: Arc<dyn PersistentStore> = match &settings.storage_dir {
            Some(dir) => Arc::new(FileStore::open(dir).map_err(|e| {
                Error::configuration(format!(
                    "cannot open storage directory {}: {e}",
                    dir.display()
                ))
            })?),
            None => Arc::new(MemoryStore::new()),
        };

        let cache = CacheStore::builder()
            .config(settings.cache.clone())
            .persistent(store)
            .build()?;
        let limiter = RateLimiter::new(settings.rate_limit.clone());
        let resolver = GeoResolver::new(
            cache.clone(),
            limiter.clone(),
            geocoder,
            settings.geo.clone(),
        )?;

        tracing::info!(
            max_entries = settings.cache.max_entries,
            storage_dir = ?settings.storage_dir,
            min_interval_ms = settings.rate_limit.min_interval.as_millis() as u64,
            "Services ready"
        );

        Ok(Self {
            settings,
            cache,
            limiter,
            resolver,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn resolver(&self) -> &GeoResolver {
        &self.resolver
    }

    /// Make these services the process-wide instance
    pub fn install(self) -> Result<&'static Services> {
        GLOBAL_SERVICES
            .set(self)
            .map_err(|_| Error::configuration("services already installed"))?;
        GLOBAL_SERVICES
            .get()
            .ok_or_else(|| Error::configuration("services were not installed"))
    }

    /// The process-wide instance, if one was installed
    pub fn global() -> Option<&'static Services> {
        GLOBAL_SERVICES.get()
    }
}
