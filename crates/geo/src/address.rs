//! Reverse geocoding results

use crate::coordinates::Coordinates;
use serde::{Deserialize, Serialize};

/// A postal address for a point
///
/// Every component is optional: providers return whatever they know, and a
/// fallback address carries only the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    /// City, town or village, whichever the provider reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// The point the provider resolved, which may differ from the query
    pub coordinates: Coordinates,
}

impl Address {
    /// Degraded answer used when no provider result is available
    pub fn fallback(coordinates: Coordinates) -> Self {
        Self {
            display_name: coordinates.to_string(),
            house_number: None,
            road: None,
            neighbourhood: None,
            city: None,
            state: None,
            postcode: None,
            country: None,
            country_code: None,
            coordinates,
        }
    }

    /// True when only the coordinates are known
    pub fn is_fallback(&self) -> bool {
        self.road.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
            && self.display_name == self.coordinates.to_string()
    }
}
