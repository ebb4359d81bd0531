//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinate outside the WGS84 range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Invalid phone number format
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Unknown travel mode token
    #[error("Invalid travel mode: {0}")]
    InvalidTravelMode(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_entity_and_id() {
        let err = DomainError::not_found("Booking", "abc");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Booking");
                assert_eq!(id, "abc");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("Booking", "abc");
        assert_eq!(err.to_string(), "Booking not found: abc");
    }

    #[test]
    fn invalid_coordinates_message() {
        let err = DomainError::InvalidCoordinates("latitude 91".to_string());
        assert_eq!(err.to_string(), "Invalid coordinates: latitude 91");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("name too short".to_string());
        assert_eq!(err.to_string(), "Validation failed: name too short");
    }

    #[test]
    fn not_permitted_error_message() {
        let err = DomainError::NotPermitted("booking already completed".to_string());
        assert_eq!(
            err.to_string(),
            "Operation not permitted: booking already completed"
        );
    }
}
