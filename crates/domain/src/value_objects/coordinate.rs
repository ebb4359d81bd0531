//! Geographic coordinate value object
//!
//! Coordinates are stored and emitted longitude first, matching GeoJSON and
//! the Mapbox APIs. Human input ("-4.3317,15.3369") is latitude first and is
//! swapped while parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A WGS84 position as `(longitude, latitude)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Coordinate {
    longitude: f64,
    latitude: f64,
}

impl Coordinate {
    /// Create a new coordinate with range validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinates(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Create a coordinate without validation (for trusted constants)
    #[must_use]
    pub const fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Parse a raw `"lat,lon"` pair
    ///
    /// Returns `None` when the input does not have the shape of two
    /// comma-separated numbers, so the caller can treat it as an address.
    /// Whitespace around each number is ignored.
    pub fn parse_lat_lon(input: &str) -> Option<Result<Self, DomainError>> {
        let (lat, lon) = input.split_once(',')?;
        let latitude = parse_number(lat)?;
        let longitude = parse_number(lon)?;
        Some(Self::new(longitude, latitude))
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Render as `"lat,lon"`, the order people type coordinates in
    #[must_use]
    pub fn to_lat_lon_string(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Center of Kinshasa, used as the geocoding proximity bias
    #[must_use]
    pub const fn kinshasa() -> Self {
        Self::new_unchecked(15.3369, -4.3317)
    }
}

/// Accept only plain decimal notation so that words like "inf" or "nan"
/// fall through to free-text handling.
fn parse_number(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty()
        || !token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }
    token.parse().ok()
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.longitude, self.latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.longitude, c.latitude]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = DomainError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}
