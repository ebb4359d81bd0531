//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod booking_store;
mod database_health_port;
mod directions_port;
mod driver_dispatch_port;
mod geocoding_port;

pub use booking_store::BookingStore;
#[cfg(test)]
pub use booking_store::MockBookingStore;
#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
pub use directions_port::DirectionsPort;
#[cfg(test)]
pub use directions_port::MockDirectionsPort;
pub use driver_dispatch_port::DriverDispatchPort;
#[cfg(test)]
pub use driver_dispatch_port::MockDriverDispatchPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{GeocodedPlace, GeocodingPort, GeocodingRequest};
