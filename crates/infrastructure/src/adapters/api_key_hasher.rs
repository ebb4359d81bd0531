//! API key hashing with Argon2id
//!
//! Keys are stored in configuration as PHC strings and checked against the
//! bearer token of each request.
//!
//! # Examples
//!
//! ```
//! use infrastructure::adapters::ApiKeyHasher;
//!
//! let hasher = ApiKeyHasher::new();
//! let hash = hasher.hash("mw-live-key").unwrap();
//!
//! assert!(hasher.verify("mw-live-key", &hash).unwrap());
//! assert!(!hasher.verify("other-key", &hash).unwrap());
//! ```

use argon2::{
    Argon2, PasswordHash, PasswordHasher as ArgonPasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur during API key hashing operations
#[derive(Debug, Error)]
pub enum ApiKeyHashError {
    /// Failed to hash the API key
    #[error("Failed to hash API key: {0}")]
    HashingFailed(String),

    /// The stored hash is not a valid PHC string
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
}

/// API key hasher using Argon2id with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiKeyHasher;

impl ApiKeyHasher {
    /// Create a new API key hasher
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Hash an API key into a PHC string with a random salt
    ///
    /// # Errors
    ///
    /// Returns `ApiKeyHashError::HashingFailed` if hashing fails.
    #[instrument(skip_all)]
    pub fn hash(&self, api_key: &str) -> Result<String, ApiKeyHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(api_key.as_bytes(), &salt)
            .map_err(|e| ApiKeyHashError::HashingFailed(e.to_string()))?;

        debug!("Hashed API key");
        Ok(hash.to_string())
    }

    /// Check an API key against a stored PHC hash
    ///
    /// # Errors
    ///
    /// Returns `ApiKeyHashError::InvalidHashFormat` if `hash` cannot be parsed.
    #[instrument(skip_all)]
    pub fn verify(&self, api_key: &str, hash: &str) -> Result<bool, ApiKeyHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ApiKeyHashError::InvalidHashFormat(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(api_key.as_bytes(), &parsed)
            .is_ok())
    }

    /// Whether a configured value looks like an Argon2 PHC hash
    ///
    /// ```
    /// use infrastructure::adapters::ApiKeyHasher;
    ///
    /// assert!(ApiKeyHasher::is_hashed("$argon2id$v=19$m=19456,t=2,p=1$..."));
    /// assert!(!ApiKeyHasher::is_hashed("mw-plaintext-key"));
    /// ```
    #[must_use]
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with("$argon2")
    }
}
