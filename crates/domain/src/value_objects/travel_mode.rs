//! Travel mode value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Travel mode used to request directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// By car (preferred)
    #[default]
    Driving,
    /// On foot
    Walking,
}

impl TravelMode {
    /// Routing profile token understood by the directions service
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "walking" | "foot" => Ok(Self::Walking),
            other => Err(DomainError::InvalidTravelMode(other.to_string())),
        }
    }
}
