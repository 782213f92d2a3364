//! Coordinate quantization
//!
//! Nearby points share one cache entry by rounding both axes to a fixed
//! number of decimal places. Each extra place divides the cell size by ten:
//!
//! | precision | cell size at the equator |
//! |-----------|--------------------------|
//! | 2         | ~1.1 km                  |
//! | 3         | ~110 m                   |
//! | 4         | ~11 m                    |
//! | 5         | ~1.1 m                   |
//!
//! Coarser cells raise the hit rate, but every point in a cell gets the
//! answer that was computed for whichever point in it was resolved first.

use crate::coordinates::Coordinates;
use tiercache_core::DEFAULT_GEO_PRECISION;

/// Largest precision accepted; finer cells than this are below GPS noise
pub const MAX_PRECISION: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    precision: u32,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            precision: DEFAULT_GEO_PRECISION,
        }
    }
}

impl Quantizer {
    /// Precision is clamped to [`MAX_PRECISION`]
    pub fn new(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Round one axis, folding negative zero into zero
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        let rounded = (value * factor).round() / factor;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// The cell centre a point belongs to
    pub fn quantize(&self, coordinates: Coordinates) -> Coordinates {
        Coordinates::new(
            self.round(coordinates.latitude),
            self.round(coordinates.longitude),
        )
    }

    /// Cache key for the cell, `"lat,lon"` with `precision` decimals
    pub fn key(&self, coordinates: Coordinates) -> String {
        let cell = self.quantize(coordinates);
        let places = self.precision as usize;
        format!(
            "{:.places$},{:.places$}",
            cell.latitude, cell.longitude
        )
    }
}
