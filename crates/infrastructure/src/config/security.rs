//! Security configuration: API key authentication.

use serde::{Deserialize, Serialize};

/// Configuration for a hashed API key with associated user ID
///
/// API keys must be pre-hashed using Argon2id format (PHC string).
/// Use `mwinda-cli hash-api-key <key>` to generate one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    /// Argon2id hash of the API key in PHC format
    /// Example: "$argon2id$v=19$m=19456,t=2,p=1$..."
    pub hash: String,

    /// User ID associated with this API key
    pub user_id: String,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Hashed API keys for authentication
    ///
    /// When empty, authentication is disabled and every request acts as
    /// `anonymous_user_id`.
    ///
    /// Example in config.toml:
    /// ```toml
    /// [[security.api_keys]]
    /// hash = "$argon2id$v=19$m=19456,t=2,p=1$..."
    /// user_id = "550e8400-e29b-41d4-a716-446655440000"
    /// ```
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,

    /// Identity used for every request while authentication is disabled
    #[serde(default = "default_anonymous_user_id")]
    pub anonymous_user_id: String,
}

fn default_anonymous_user_id() -> String {
    "00000000-0000-0000-0000-000000000000".to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            anonymous_user_id: default_anonymous_user_id(),
        }
    }
}

impl SecurityConfig {
    /// Number of API keys that are not Argon2 hashes
    #[must_use]
    pub fn count_plaintext_keys(&self) -> usize {
        self.api_keys
            .iter()
            .filter(|entry| !entry.hash.starts_with("$argon2"))
            .count()
    }

    /// Check if the configuration has any API keys configured
    #[must_use]
    pub fn has_api_keys(&self) -> bool {
        !self.api_keys.is_empty()
    }
}
