//! Booking storage port
//!
//! Defines the interface for persisting ride bookings.

use async_trait::async_trait;
use domain::{Booking, BookingId, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for booking persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a new booking
    async fn save(&self, booking: &Booking) -> Result<(), ApplicationError>;

    /// Overwrite the mutable fields (status, driver) of an existing booking
    ///
    /// # Returns
    /// true if a booking was updated, false if it didn't exist
    async fn update(&self, booking: &Booking) -> Result<bool, ApplicationError>;

    /// Get a booking by ID
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>, ApplicationError>;

    /// List a user's bookings, newest first
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Booking>, ApplicationError>;

    /// Delete a booking
    ///
    /// # Returns
    /// true if the booking was deleted, false if it didn't exist
    async fn delete(&self, id: &BookingId) -> Result<bool, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn BookingStore) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn BookingStore>();
    }
}
