//! Ride booking entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Driver, ResolvedRoute};
use crate::errors::DomainError;
use crate::value_objects::{BookingId, BookingStatus, Fare, PhoneNumber, UserId};

/// A validated booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBooking {
    /// Customer name
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    /// Customer phone
    pub phone: PhoneNumber,
    /// Pickup address or `"lat,lon"`
    #[validate(length(min = 3, message = "departure must have at least 3 characters"))]
    pub departure: String,
    /// Destination address or `"lat,lon"`
    #[validate(length(min = 3, message = "arrival must have at least 3 characters"))]
    pub arrival: String,
}

impl NewBooking {
    /// Build a booking request from raw form fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhoneNumber` or `ValidationError` when a field does
    /// not meet the form rules.
    pub fn new(
        name: impl AsRef<str>,
        phone: impl AsRef<str>,
        departure: impl AsRef<str>,
        arrival: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        let candidate = Self {
            name: name.as_ref().trim().to_string(),
            phone: PhoneNumber::new(phone.as_ref())?,
            departure: departure.as_ref().trim().to_string(),
            arrival: arrival.as_ref().trim().to_string(),
        };
        candidate
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        Ok(candidate)
    }
}

/// A stored booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,
    /// Owner
    pub user_id: UserId,
    /// Customer name
    pub name: String,
    /// Customer phone
    pub phone: PhoneNumber,
    /// Pickup as entered
    pub departure: String,
    /// Destination as entered
    pub arrival: String,
    /// Resolved pickup as `"lat,lon"`
    pub departure_coords: Option<String>,
    /// Resolved destination as `"lat,lon"`
    pub arrival_coords: Option<String>,
    /// Route distance in meters
    pub distance_m: Option<f64>,
    /// Route duration in whole seconds
    pub duration_s: Option<i64>,
    /// Estimated fare
    pub price: Option<Fare>,
    /// Lifecycle state
    pub status: BookingStatus,
    /// Assigned driver
    pub driver: Option<Driver>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a pending booking without route information
    pub fn new(user_id: UserId, request: NewBooking) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            user_id,
            name: request.name,
            phone: request.phone,
            departure: request.departure,
            arrival: request.arrival,
            departure_coords: None,
            arrival_coords: None,
            distance_m: None,
            duration_s: None,
            price: None,
            status: BookingStatus::Pending,
            driver: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the summary of a resolved route and its fare
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_route(mut self, route: &ResolvedRoute) -> Self {
        let distance_m = route.result.distance_m();
        self.departure_coords = Some(route.departure.to_lat_lon_string());
        self.arrival_coords = Some(route.arrival.to_lat_lon_string());
        self.distance_m = Some(distance_m);
        self.duration_s = Some(route.result.duration_s().round() as i64);
        self.price = Some(Fare::for_distance(distance_m));
        self
    }

    /// Whether the booking belongs to a user
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Record the driver who accepted the ride
    ///
    /// # Errors
    ///
    /// Returns `NotPermitted` unless the booking is pending.
    pub fn assign_driver(&mut self, driver: Driver) -> Result<(), DomainError> {
        if self.status != BookingStatus::Pending {
            return Err(DomainError::NotPermitted(format!(
                "cannot assign a driver to a {} booking",
                self.status
            )));
        }
        self.driver = Some(driver);
        self.status = BookingStatus::Confirmed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancel the booking
    ///
    /// # Errors
    ///
    /// Returns `NotPermitted` for completed or already cancelled bookings.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.is_cancellable() {
            return Err(DomainError::NotPermitted(format!(
                "cannot cancel a {} booking",
                self.status
            )));
        }
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}
