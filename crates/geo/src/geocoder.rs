//! Reverse geocoding providers

use crate::address::Address;
use crate::coordinates::Coordinates;
use async_trait::async_trait;
use thiserror::Error;

/// Why a provider could not resolve a point
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request to geocoding provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered but had no result for the point
    #[error("no address found: {0}")]
    NotFound(String),

    #[error("unexpected response from geocoding provider: {0}")]
    Decode(String),

    #[error("geocoder configuration error: {0}")]
    Configuration(String),
}

impl GeocodeError {
    /// Whether retrying later could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound(_) | Self::Decode(_) | Self::Configuration(_) => false,
        }
    }
}

/// Resolves coordinates into an address
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Short provider name recorded with cached results
    fn name(&self) -> &str;

    async fn reverse(&self, coordinates: Coordinates) -> Result<Address, GeocodeError>;
}
