//! Driver dispatch port
//!
//! Finds a driver willing to take a ride from a pickup point.

use async_trait::async_trait;
use domain::{Coordinate, Driver};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for matching a ride with a driver
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DriverDispatchPort: Send + Sync {
    /// Find a driver for a pickup point
    ///
    /// # Returns
    /// `None` when no driver is available
    async fn find_driver(&self, pickup: Coordinate) -> Result<Option<Driver>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn DriverDispatchPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DriverDispatchPort>();
    }
}
