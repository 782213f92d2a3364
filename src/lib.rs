//! tiercache: a two-tier cache with a paced, cached reverse geocoder
//!
//! The workspace is split into:
//!
//! - [`tiercache_cache`]: the [`CacheStore`] with its memory and persistent
//!   tiers, TTL, priorities and eviction.
//! - [`tiercache_utils`]: the [`RateLimiter`], logging setup and atomic
//!   file writes.
//! - [`tiercache_geo`]: [`GeoResolver`], quantized reverse geocoding on top
//!   of both.
//! - [`tiercache_core`]: shared errors, the [`Clock`] and constants.
//!
//! This crate adds layered [`Settings`] and the [`Services`] composition
//! root.
//!
//! ```rust,no_run
//! use tiercache::{Coordinates, Services};
//!
//! # async fn example() -> tiercache::Result<()> {
//! tiercache::logging::init().ok();
//! let services = Services::load()?;
//! let resolution = services
//!     .resolver()
//!     .resolve(Coordinates::new(19.4326, -99.1332))
//!     .await;
//! println!("{} ({:?})", resolution.address.display_name, resolution.source);
//! # Ok(())
//! # }
//! ```

pub mod services;
pub mod settings;

pub use services::Services;
pub use settings::{ConfigSource, Settings, SettingsLoader};

pub use tiercache_cache::{
    CacheConfig, CacheError, CacheStatistics, CacheStore, EncryptionCodec, EntryMetadata,
    FileStore, GetOptions, MemoryStore, PersistentStore, Priority, SetOptions, Tier,
};
pub use tiercache_core::{Clock, Error, ManualClock, Result, SystemClock};
pub use tiercache_geo::{
    Address, Coordinates, GeoConfig, GeoResolver, GeocodeError, Geocoder, NominatimConfig,
    NominatimGeocoder, Quantizer, Resolution, ResolutionSource,
};
pub use tiercache_utils::{logging, ExecuteError, RateLimiter, RateLimiterConfig};
