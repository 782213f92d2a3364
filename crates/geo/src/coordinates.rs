//! Geographic coordinates

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid coordinates ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub reason: &'static str,
}

/// A WGS84 point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite, latitude within ±90 and longitude within ±180
    pub fn validate(&self) -> Result<(), InvalidCoordinates> {
        let reason = if !self.latitude.is_finite() || !self.longitude.is_finite() {
            Some("coordinates must be finite")
        } else if self.latitude.abs() > 90.0 {
            Some("latitude must be within ±90")
        } else if self.longitude.abs() > 180.0 {
            Some("longitude must be within ±180")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
