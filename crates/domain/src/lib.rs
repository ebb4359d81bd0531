//! Domain layer for Mwinda
//!
//! Contains the ride-booking vocabulary: coordinates and parsed location
//! inputs, travel modes, routes and their selection result, bookings,
//! drivers and fares. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
