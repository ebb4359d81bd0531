//! Ride fare in Congolese francs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Flat pickup charge in FC
pub const BASE_FARE_FC: f64 = 1000.0;

/// Charge per kilometer in FC
pub const PER_KM_FC: f64 = 500.0;

/// A fare rounded to the whole franc
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fare(u64);

impl Fare {
    /// Estimate the fare for a distance in meters
    ///
    /// Negative or non-finite distances are treated as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_distance(distance_m: f64) -> Self {
        let km = if distance_m.is_finite() {
            distance_m.max(0.0) / 1000.0
        } else {
            0.0
        };
        Self(PER_KM_FC.mul_add(km, BASE_FARE_FC).round() as u64)
    }

    /// Create from a stored amount
    #[must_use]
    pub const fn from_francs(amount: u64) -> Self {
        Self(amount)
    }

    /// Amount in FC
    #[must_use]
    pub const fn francs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} FC", self.0)
    }
}
