//! Value Objects - Immutable, identity-less domain primitives

mod booking_id;
mod booking_status;
mod coordinate;
mod fare;
mod location_input;
mod phone_number;
mod travel_mode;
mod user_id;

pub use booking_id::BookingId;
pub use booking_status::BookingStatus;
pub use coordinate::Coordinate;
pub use fare::{BASE_FARE_FC, Fare, PER_KM_FC};
pub use location_input::LocationInput;
pub use phone_number::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS, PhoneNumber};
pub use travel_mode::TravelMode;
pub use user_id::UserId;
