//! Customer phone number value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Minimum digit count accepted by the booking form
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum digit count (E.164 limit)
pub const MAX_PHONE_DIGITS: usize = 15;

/// A phone number normalized to digits with an optional leading `+`
///
/// Local Congolese numbers ("081 234 5678") and international ones
/// ("+243 81 234 5678") are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber {
    value: String,
}

impl PhoneNumber {
    /// Create a new phone number, stripping separators
    pub fn new(number: impl Into<String>) -> Result<Self, DomainError> {
        let value = number.into().trim().replace([' ', '-', '(', ')', '.'], "");

        let digits = value.strip_prefix('+').unwrap_or(&value);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPhoneNumber(
                "Phone number must contain only digits".to_string(),
            ));
        }

        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(DomainError::InvalidPhoneNumber(format!(
                "Phone number must have {MIN_PHONE_DIGITS}-{MAX_PHONE_DIGITS} digits"
            )));
        }

        Ok(Self { value })
    }

    /// Get the normalized number
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the number carries an international prefix
    pub fn is_international(&self) -> bool {
        self.value.starts_with('+')
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.value
    }
}
