//! Reverse geocoding backed by the tiered cache
//!
//! [`GeoResolver`] turns coordinates into addresses. Points are quantized so
//! nearby lookups share a cache entry, misses are sent to a [`Geocoder`]
//! through a [`RateLimiter`](tiercache_utils::RateLimiter), and provider
//! failures degrade to a coordinate-only fallback address.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tiercache_cache::{CacheConfig, CacheStore};
//! use tiercache_geo::{Coordinates, GeoConfig, GeoResolver, NominatimConfig, NominatimGeocoder};
//! use tiercache_utils::{RateLimiter, RateLimiterConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = GeoResolver::new(
//!     CacheStore::in_memory(CacheConfig::default())?,
//!     RateLimiter::new(RateLimiterConfig::for_nominatim()),
//!     Arc::new(NominatimGeocoder::new(NominatimConfig::default())?),
//!     GeoConfig::default(),
//! )?;
//!
//! let resolution = resolver.resolve(Coordinates::new(19.4326, -99.1332)).await;
//! println!("{}", resolution.address.display_name);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod config;
pub mod coordinates;
pub mod geocoder;
pub mod nominatim;
pub mod quantizer;
pub mod resolver;

pub use address::Address;
pub use config::GeoConfig;
pub use coordinates::{Coordinates, InvalidCoordinates};
pub use geocoder::{GeocodeError, Geocoder};
pub use nominatim::{NominatimConfig, NominatimGeocoder};
pub use quantizer::Quantizer;
pub use resolver::{GeoResolver, Resolution, ResolutionSource};
