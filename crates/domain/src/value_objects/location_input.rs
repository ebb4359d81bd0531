//! Route endpoint as entered by the user
//!
//! The decision between "raw coordinate" and "address to geocode" is made
//! once, here, and carried as a variant afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::errors::DomainError;

/// A parsed route endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationInput {
    /// Raw coordinate typed as `"lat,lon"`, needs no geocoding
    Coordinate(Coordinate),
    /// Free-text address to geocode
    FreeText(String),
}

impl LocationInput {
    /// Parse user input
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for blank input and `InvalidCoordinates` for
    /// a coordinate pair outside the WGS84 range.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "location must not be empty".to_string(),
            ));
        }
        match Coordinate::parse_lat_lon(trimmed) {
            Some(coordinate) => Ok(Self::Coordinate(coordinate?)),
            None => Ok(Self::FreeText(trimmed.to_string())),
        }
    }
}

impl fmt::Display for LocationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate(c) => f.write_str(&c.to_lat_lon_string()),
            Self::FreeText(text) => f.write_str(text),
        }
    }
}

impl std::str::FromStr for LocationInput {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
