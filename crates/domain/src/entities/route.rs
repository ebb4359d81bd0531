//! Routed paths and the driving/walking selection result

use serde::{Deserialize, Serialize};

use crate::value_objects::{Coordinate, TravelMode};

/// Walking routes faster than this are considered implausible
///
/// The directions service sometimes returns walking durations that match
/// driving speeds. Both walking constants are a heuristic tuned for
/// Kinshasa, not a contract of the vendor.
pub const WALKING_PLAUSIBILITY_LIMIT_KMH: f64 = 6.0;

/// Speed used to recompute implausible walking durations
pub const ASSUMED_WALKING_SPEED_KMH: f64 = 4.5;

/// A path returned by the directions service for one travel mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    /// Total distance in meters
    pub distance_m: f64,
    /// Total duration in seconds
    pub duration_s: f64,
    /// Ordered path geometry
    pub geometry: Vec<Coordinate>,
}

impl RoutePath {
    /// Create a new path
    pub fn new(distance_m: f64, duration_s: f64, geometry: Vec<Coordinate>) -> Self {
        Self {
            distance_m,
            duration_s,
            geometry,
        }
    }

    /// Average speed implied by distance and duration
    ///
    /// Returns `None` for a zero-length path.
    #[must_use]
    pub fn average_speed_kmh(&self) -> Option<f64> {
        if self.distance_m <= 0.0 {
            return None;
        }
        if self.duration_s <= 0.0 {
            return Some(f64::INFINITY);
        }
        Some((self.distance_m / 1000.0) / (self.duration_s / 3600.0))
    }

    /// Replace an implausibly fast walking duration
    ///
    /// When the implied speed exceeds [`WALKING_PLAUSIBILITY_LIMIT_KMH`], the
    /// duration becomes the time needed at [`ASSUMED_WALKING_SPEED_KMH`].
    #[must_use]
    pub fn with_walking_correction(mut self) -> Self {
        if self
            .average_speed_kmh()
            .is_some_and(|speed| speed > WALKING_PLAUSIBILITY_LIMIT_KMH)
        {
            self.duration_s = walking_duration_s(self.distance_m);
        }
        self
    }
}

/// Seconds needed to walk a distance at the assumed walking speed
#[must_use]
pub fn walking_duration_s(distance_m: f64) -> f64 {
    distance_m / (ASSUMED_WALKING_SPEED_KMH * 1000.0 / 3600.0)
}

/// Outcome of the dual-mode route lookup
///
/// Driving wins whenever it succeeded. The driving duration is therefore
/// available exactly when the `Driving` variant was selected; a walking
/// result never carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RouteResult {
    /// Driving succeeded
    Driving {
        /// The driving path
        route: RoutePath,
        /// Walking duration, when the walking lookup succeeded too
        walking_duration_s: Option<f64>,
    },
    /// Driving failed, walking succeeded
    Walking {
        /// The walking path
        route: RoutePath,
    },
}

impl RouteResult {
    /// Selected travel mode
    #[must_use]
    pub const fn mode(&self) -> TravelMode {
        match self {
            Self::Driving { .. } => TravelMode::Driving,
            Self::Walking { .. } => TravelMode::Walking,
        }
    }

    /// Path of the selected mode
    #[must_use]
    pub const fn route(&self) -> &RoutePath {
        match self {
            Self::Driving { route, .. } | Self::Walking { route } => route,
        }
    }

    /// Distance of the selected path in meters
    #[must_use]
    pub const fn distance_m(&self) -> f64 {
        self.route().distance_m
    }

    /// Duration of the selected path in seconds
    #[must_use]
    pub const fn duration_s(&self) -> f64 {
        self.route().duration_s
    }

    /// Geometry of the selected path
    #[must_use]
    pub fn geometry(&self) -> &[Coordinate] {
        &self.route().geometry
    }

    /// Driving duration from the directions service, if driving succeeded
    #[must_use]
    pub const fn driving_duration_s(&self) -> Option<f64> {
        match self {
            Self::Driving { route, .. } => Some(route.duration_s),
            Self::Walking { .. } => None,
        }
    }

    /// Walking duration, if the walking lookup succeeded
    #[must_use]
    pub const fn walking_duration_s(&self) -> Option<f64> {
        match self {
            Self::Driving {
                walking_duration_s, ..
            } => *walking_duration_s,
            Self::Walking { route } => Some(route.duration_s),
        }
    }

    /// Driving time to show the user: the real one when known, otherwise
    /// an estimate from the distance
    #[must_use]
    pub fn display_driving_time_s(&self) -> f64 {
        self.driving_duration_s()
            .unwrap_or_else(|| estimated_driving_time_s(self.distance_m()))
    }
}

/// A route result together with the resolved endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Resolved departure
    pub departure: Coordinate,
    /// Resolved arrival
    pub arrival: Coordinate,
    /// Selected route
    pub result: RouteResult,
}

/// Estimate the driving time for a distance when no real figure exists
///
/// Average speeds grow with trip length: dense downtown traffic for short
/// trips, main roads for long ones.
#[must_use]
pub fn estimated_driving_time_s(distance_m: f64) -> f64 {
    let km = distance_m / 1000.0;
    let avg_speed_kmh = if km <= 5.0 {
        20.0
    } else if km <= 15.0 {
        30.0
    } else if km <= 30.0 {
        40.0
    } else {
        50.0
    };
    km / avg_speed_kmh * 3600.0
}

/// Format a distance for display ("850 m", "12.4 km")
#[must_use]
pub fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{} m", distance_m.round())
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    }
}

/// Format a duration for display ("25 min", "1h 5min")
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(duration_s: f64) -> String {
    let minutes = (duration_s / 60.0).round() as i64;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{}h {}min", minutes / 60, minutes % 60)
    }
}
