//! Drivers and driver matches

use serde::{Deserialize, Serialize};

/// A driver who can accept rides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Display name
    pub name: String,
    /// Car model
    pub car: String,
    /// Average rating out of 5
    pub rating: f32,
    /// Contact number
    pub phone: String,
    /// Minutes until pickup
    pub eta_minutes: u32,
    /// License plate
    pub plate: String,
}

impl Driver {
    /// Create a new driver
    pub fn new(
        name: impl Into<String>,
        car: impl Into<String>,
        rating: f32,
        phone: impl Into<String>,
        eta_minutes: u32,
        plate: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            car: car.into(),
            rating,
            phone: phone.into(),
            eta_minutes,
            plate: plate.into(),
        }
    }

    /// The demo roster used by the simulated dispatcher
    pub fn demo_roster() -> Vec<Self> {
        vec![
            Self::new("Alex", "Toyota Corolla", 4.8, "+33 6 12 34 56 78", 3, "AB-123-CD"),
            Self::new("Marie", "Renault Clio", 4.9, "+33 6 98 76 54 32", 5, "XY-789-ZW"),
            Self::new("Thomas", "Peugeot 208", 4.7, "+33 6 45 67 89 01", 2, "EF-456-GH"),
        ]
    }
}

/// A driver assigned to a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverMatch {
    /// The assigned driver
    pub driver: Driver,
    /// Expected trip time in minutes, from the driving duration when known
    pub trip_minutes: Option<u32>,
}

impl DriverMatch {
    /// Create a match, deriving the trip time from a driving duration
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(driver: Driver, driving_duration_s: Option<f64>) -> Self {
        let trip_minutes = driving_duration_s
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(|s| (s / 60.0).round() as u32);
        Self {
            driver,
            trip_minutes,
        }
    }
}
