//! API key authentication middleware
//!
//! Validates Bearer tokens in the Authorization header against Argon2id
//! hashes from configuration. Each key maps to a user ID; the middleware
//! injects a [`RequestContext`] for that user into the request extensions.
//!
//! When no keys are configured, authentication is disabled and every request
//! runs as the configured anonymous user.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::RequestContext;
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    response::{IntoResponse, Response},
};
use domain::UserId;
use infrastructure::{ApiKeyHasher, SecurityConfig, config::ApiKeyEntry};
use tower::{Layer, Service};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::request_id::request_id_of;

/// Paths served without authentication
const PUBLIC_PATHS: [&str; 2] = ["/health", "/ready"];

#[derive(Clone, Debug)]
struct VerifiedKeyEntry {
    hash: String,
    user_id: UserId,
}

/// Configured API keys with their owners
#[derive(Clone, Debug, Default)]
pub struct ApiKeyStore {
    entries: Vec<VerifiedKeyEntry>,
    hasher: ApiKeyHasher,
}

impl ApiKeyStore {
    /// Build the store, skipping entries whose user ID is not a UUID
    #[must_use]
    pub fn from_entries(entries: Vec<ApiKeyEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|entry| match UserId::parse(&entry.user_id) {
                Ok(user_id) => Some(VerifiedKeyEntry {
                    hash: entry.hash,
                    user_id,
                }),
                Err(e) => {
                    warn!(
                        user_id = %entry.user_id,
                        error = %e,
                        "Invalid user ID in security.api_keys, skipping entry"
                    );
                    None
                },
            })
            .collect();

        Self {
            entries,
            hasher: ApiKeyHasher::new(),
        }
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify an API key and return the associated user ID if valid
    #[must_use]
    pub fn verify(&self, api_key: &str) -> Option<UserId> {
        self.entries.iter().find_map(|entry| {
            match self.hasher.verify(api_key, &entry.hash) {
                Ok(true) => Some(entry.user_id),
                Ok(false) => None,
                Err(e) => {
                    warn!(error = %e, "Error verifying API key hash");
                    None
                },
            }
        })
    }
}

#[derive(Debug)]
enum AuthMode {
    /// No keys configured; every request acts as this user
    Anonymous(UserId),
    /// Keys configured; requests must present one of them
    Required(ApiKeyStore),
}

/// Layer that applies API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuthLayer {
    mode: Arc<AuthMode>,
}

impl ApiKeyAuthLayer {
    /// Authentication disabled; requests run as `user_id`
    #[must_use]
    pub fn anonymous(user_id: UserId) -> Self {
        Self {
            mode: Arc::new(AuthMode::Anonymous(user_id)),
        }
    }

    /// Require one of the given keys
    ///
    /// Entries that fail to parse are dropped; if none remain, every
    /// protected request is rejected.
    #[must_use]
    pub fn from_api_keys(entries: Vec<ApiKeyEntry>) -> Self {
        Self {
            mode: Arc::new(AuthMode::Required(ApiKeyStore::from_entries(entries))),
        }
    }

    /// Pick the mode from the security configuration
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        if config.has_api_keys() {
            return Self::from_api_keys(config.api_keys.clone());
        }

        let user_id = UserId::parse(&config.anonymous_user_id).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid security.anonymous_user_id, using the nil UUID");
            UserId::from_uuid(Uuid::nil())
        });
        Self::anonymous(user_id)
    }

    /// Whether requests must present an API key
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(*self.mode, AuthMode::Required(_))
    }
}

impl<S> Layer<S> for ApiKeyAuthLayer {
    type Service = ApiKeyAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuth {
            inner,
            mode: Arc::clone(&self.mode),
        }
    }
}

/// Middleware service for API key authentication
#[derive(Clone, Debug)]
pub struct ApiKeyAuth<S> {
    inner: S,
    mode: Arc<AuthMode>,
}

impl<S> Service<Request> for ApiKeyAuth<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let mode = Arc::clone(&self.mode);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.uri().path()) {
                return inner.call(req).await;
            }

            let store = match mode.as_ref() {
                AuthMode::Anonymous(user_id) => {
                    inject_request_context(&mut req, *user_id);
                    return inner.call(req).await;
                },
                AuthMode::Required(_) => Arc::clone(&mode),
            };

            let token = match bearer_token(&req) {
                Ok(token) => token.to_string(),
                Err(message) => return Ok(unauthorized_response(message)),
            };

            // Argon2 verification is CPU-bound
            let verified = tokio::task::spawn_blocking(move || match store.as_ref() {
                AuthMode::Required(keys) => keys.verify(&token),
                AuthMode::Anonymous(_) => None,
            })
            .await
            .ok()
            .flatten();

            match verified {
                Some(user_id) => {
                    debug!(%user_id, "API key verified");
                    inject_request_context(&mut req, user_id);
                    inner.call(req).await
                },
                None => Ok(unauthorized_response("Invalid API key")),
            }
        })
    }
}

fn bearer_token(req: &Request) -> Result<&str, &'static str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header")?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or("Invalid authorization format, expected Bearer token")
}

/// Insert a `RequestContext` carrying the caller and the request ID
fn inject_request_context(req: &mut Request, user_id: UserId) {
    let request_id = request_id_of(req).unwrap_or_else(Uuid::now_v7);
    req.extensions_mut()
        .insert(RequestContext::with_request_id(user_id, request_id));
}

fn unauthorized_response(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}
