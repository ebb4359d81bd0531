//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `security`: API key authentication
//! - `database`: SQLite booking store
//! - `integrations`: Mapbox and simulated driver dispatch
//!
//! Values come from built-in defaults, an optional `config.toml` and
//! environment variables prefixed with `MWINDA_` (nested keys separated by
//! `__`, e.g. `MWINDA_SERVER__PORT=8080`).

mod database;
mod integrations;
mod security;
mod server;

use std::fmt;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use integrations::{DispatchConfig, MapboxAppConfig};
pub use security::{ApiKeyEntry, SecurityConfig};
pub use server::{LogFormat, ServerConfig};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MWINDA";

/// Conventional Mapbox variable honored when no token is configured
pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls security validation strictness and default behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - relaxed security warnings
    #[default]
    Development,
    /// Production environment - strict security validation
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Booking database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Mapbox geocoding and directions configuration
    #[serde(default)]
    pub mapbox: MapboxAppConfig,

    /// Simulated driver dispatch configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.toml` when `None`)
    /// and the environment
    ///
    /// An explicit file must exist; the default one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_token_fallback(std::env::var(MAPBOX_TOKEN_ENV).ok());
        Ok(config)
    }

    /// Use `token` as the Mapbox access token if none is configured
    pub fn apply_token_fallback(&mut self, token: Option<String>) {
        if self.mapbox.access_token.is_some() {
            return;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            debug!("Using Mapbox access token from {MAPBOX_TOKEN_ENV}");
            self.mapbox.access_token = Some(SecretString::from(token));
        }
    }

    /// Effective environment (development when unset)
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Whether the application runs in production
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment() == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
        assert!(!AppConfig::default().is_production());
    }

    #[test]
    fn environment_display() {
        assert_eq!(format!("{}", Environment::Development), "development");
        assert_eq!(format!("{}", Environment::Production), "production");
    }

    #[test]
    fn environment_from_str() {
        assert_eq!(
            "prod".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "DEVELOPMENT".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn deserializes_from_toml() {
        let toml = r#"
            environment = "production"

            [server]
            port = 8080
            log_format = "json"

            [mapbox]
            access_token = "pk.from-file"
            metro_name = "Kinshasa"

            [dispatch]
            search_delay_ms = 0

            [[security.api_keys]]
            hash = "$argon2id$v=19$m=19456,t=2,p=1$abc$def"
            user_id = "550e8400-e29b-41d4-a716-446655440000"
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();

        assert!(config.is_production());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.dispatch.search_delay_ms, 0);
        assert_eq!(config.security.api_keys.len(), 1);
        assert_eq!(
            config
                .mapbox
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            Some("pk.from-file".to_string())
        );
    }

    #[test]
    fn token_fallback_fills_missing_token() {
        let mut config = AppConfig::default();
        config.apply_token_fallback(Some("pk.env".to_string()));
        assert!(config.mapbox.has_access_token());
    }

    #[test]
    fn token_fallback_never_overrides_configured_token() {
        let mut config = AppConfig::default();
        config.mapbox.access_token = Some(SecretString::from("pk.file".to_string()));
        config.apply_token_fallback(Some("pk.env".to_string()));

        let token = config.mapbox.access_token.unwrap();
        assert_eq!(token.expose_secret(), "pk.file");
    }

    #[test]
    fn token_fallback_ignores_blank_values() {
        let mut config = AppConfig::default();
        config.apply_token_fallback(Some("  ".to_string()));
        assert!(!config.mapbox.has_access_token());
    }

    #[test]
    fn debug_never_prints_token() {
        let mut config = AppConfig::default();
        config.mapbox.access_token = Some(SecretString::from("pk.secret".to_string()));
        assert!(!format!("{config:?}").contains("pk.secret"));
    }
}
