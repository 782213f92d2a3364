//! Resilience patterns for calling constrained external services.
//!
//! ## Key Components
//!
//! - **`rate_limit`**: a single-worker FIFO queue that paces units of work so
//!   successive starts are at least a minimum interval apart.

pub mod rate_limit;

pub use rate_limit::{
    ExecuteError, RateLimiter, RateLimiterConfig, RateLimiterMetrics, RateLimiterState,
};
