//! Request pacing for quota-limited services
//!
//! A [`RateLimiter`] owns one FIFO queue and at most one worker task. Units
//! of work start in arrival order, never closer together than the configured
//! minimum interval, and never overlap: each one runs to completion before
//! the next may start. That gives the guarantee geocoding providers such as
//! Nominatim ask for (no more than one in-flight request, ~1 request/second).
//!
//! ## Architecture
//!
//! - [`types`] - error and state types
//! - [`config`] - limiter configuration
//! - [`metrics`] - wait-time and outcome counters
//! - [`limiter`] - the queue, worker loop and public API
//!
//! ## Example
//!
//! ```rust,no_run
//! use tiercache_utils::resilience::rate_limit::{RateLimiter, RateLimiterConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = RateLimiter::new(RateLimiterConfig::for_nominatim());
//!
//! let body = limiter
//!     .execute(|| async { Ok::<_, std::io::Error>("response".to_string()) })
//!     .await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod limiter;
pub mod metrics;
pub mod types;

pub use config::RateLimiterConfig;
pub use limiter::RateLimiter;
pub use metrics::RateLimiterMetrics;
pub use types::{ExecuteError, RateLimiterState};
