//! `tracing` subscriber initialisation
//!
//! The libraries only emit events; installing a subscriber is left to the
//! application (or a test) through these helpers.

use tiercache_core::TIERCACHE_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// The filter is read from `TIERCACHE_LOG`, then `RUST_LOG`, and defaults to
/// `info`. Output goes to stderr in the compact format.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = match std::env::var(TIERCACHE_LOG_VAR) {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?,
    };
    install(filter)
}

/// Initialize the global subscriber with explicit filter directives
pub fn init_with_filter(
    directives: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    install(EnvFilter::try_new(directives)?)
}

fn install(filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
