//! Request context carrying the caller's identity
//!
//! The HTTP authentication middleware creates a `RequestContext` for every
//! authenticated request. Services that act on behalf of a user take an
//! `Option<&RequestContext>` and fail with `NotAuthorized` when it is absent.
//!
//! # Examples
//!
//! ```
//! use application::RequestContext;
//! use domain::UserId;
//!
//! let user_id = UserId::new();
//! let ctx = RequestContext::new(user_id);
//!
//! assert_eq!(ctx.user_id(), user_id);
//! assert!(!ctx.request_id().is_nil());
//! ```

use chrono::{DateTime, Utc};
use domain::UserId;
use uuid::Uuid;

use crate::error::ApplicationError;

/// Context for a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    user_id: UserId,
    request_id: Uuid,
    timestamp: DateTime<Utc>,
}

impl RequestContext {
    /// Create a new request context for the given user
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self::with_request_id(user_id, Uuid::now_v7())
    }

    /// Create a request context correlated with an existing request ID
    ///
    /// # Examples
    ///
    /// ```
    /// use application::RequestContext;
    /// use domain::UserId;
    /// use uuid::Uuid;
    ///
    /// let request_id = Uuid::new_v4();
    /// let ctx = RequestContext::with_request_id(UserId::new(), request_id);
    /// assert_eq!(ctx.request_id(), request_id);
    /// ```
    #[must_use]
    pub fn with_request_id(user_id: UserId, request_id: Uuid) -> Self {
        Self {
            user_id,
            request_id,
            timestamp: Utc::now(),
        }
    }

    /// Return the user of a context, or `NotAuthorized` when there is none
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotAuthorized` if `ctx` is `None`.
    pub fn require_user(ctx: Option<&Self>) -> Result<UserId, ApplicationError> {
        ctx.map(Self::user_id)
            .ok_or_else(|| ApplicationError::NotAuthorized("no authenticated user".to_string()))
    }

    /// Get the authenticated user ID
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Get the unique request identifier
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Get the timestamp when the request was received
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
