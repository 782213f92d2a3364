//! Nominatim (OpenStreetMap) reverse geocoder
//!
//! The public instance allows one request per second and requires an
//! identifying `User-Agent`; run requests through a
//! [`RateLimiter`](tiercache_utils::RateLimiter) configured with
//! [`RateLimiterConfig::for_nominatim`](tiercache_utils::RateLimiterConfig::for_nominatim).

use crate::address::Address;
use crate::coordinates::Coordinates;
use crate::geocoder::{GeocodeError, Geocoder};
use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use std::time::Duration;
use tiercache_core::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};

/// Longest error body kept in [`GeocodeError::Status`]
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent with every request; the usage policy requires one
    pub user_agent: String,
    pub accept_language: Option<String>,
    /// Address detail level, 3 (country) to 18 (building)
    pub zoom: u8,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: None,
            zoom: 18,
            timeout: Duration::from_secs(10),
        }
    }
}

impl NominatimConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = Some(language.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: NominatimConfig,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        if config.user_agent.trim().is_empty() {
            return Err(GeocodeError::Configuration(
                "a User-Agent identifying the application is required".to_string(),
            ));
        }
        if !(3..=18).contains(&config.zoom) {
            return Err(GeocodeError::Configuration(format!(
                "zoom must be between 3 and 18, got {}",
                config.zoom
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    fn reverse_url(&self) -> String {
        format!("{}/reverse", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    error: Option<String>,
    display_name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

impl ReverseResponse {
    fn into_address(self, queried: Coordinates) -> Result<Address, GeocodeError> {
        if let Some(error) = self.error {
            return Err(GeocodeError::NotFound(error));
        }

        let Some(display_name) = self.display_name else {
            return Err(GeocodeError::Decode(
                "response has neither an address nor an error".to_string(),
            ));
        };

        let resolved = match (
            self.lat.as_deref().and_then(|lat| lat.parse().ok()),
            self.lon.as_deref().and_then(|lon| lon.parse().ok()),
        ) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
            _ => queried,
        };

        let address = self.address;
        Ok(Address {
            display_name,
            house_number: address.house_number,
            road: address.road,
            neighbourhood: address.neighbourhood.or(address.suburb),
            city: address
                .city
                .or(address.town)
                .or(address.village)
                .or(address.hamlet),
            state: address.state,
            postcode: address.postcode,
            country: address.country,
            country_code: address.country_code,
            coordinates: resolved,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Address, GeocodeError> {
        let query = [
            ("format", "jsonv2".to_string()),
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("zoom", self.config.zoom.to_string()),
            ("addressdetails", "1".to_string()),
        ];

        let mut request = self.client.get(self.reverse_url()).query(&query);
        if let Some(language) = &self.config.accept_language {
            request = request.header(ACCEPT_LANGUAGE, language.as_str());
        }

        tracing::debug!(%coordinates, "Requesting reverse geocode");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ReverseResponse = serde_json::from_str(&body)
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;
        parsed.into_address(coordinates)
    }
}
