//! Domain entities - Objects with identity and lifecycle

mod booking;
mod driver;
mod route;

pub use booking::{Booking, NewBooking};
pub use driver::{Driver, DriverMatch};
pub use route::{
    ASSUMED_WALKING_SPEED_KMH, ResolvedRoute, RoutePath, RouteResult,
    WALKING_PLAUSIBILITY_LIMIT_KMH, estimated_driving_time_s, format_distance, format_duration,
    walking_duration_s,
};
