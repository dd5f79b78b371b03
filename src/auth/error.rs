//! Failure kinds surfaced by the auth flows and by their collaborators.
//!
//! Collaborators return tagged errors (`StoreError`, `CacheError`, ...) and each
//! flow matches them exhaustively into an [`AuthError`]. Anything a flow cannot
//! classify becomes `AuthError::Internal`; the cause is logged where it is
//! wrapped and never rendered into a response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

pub const MSG_REGISTER_FIELDS: &str = "Missing required fields.";
pub const MSG_LOGIN_FIELDS: &str = "Username and password are required.";
pub const MSG_PROFILE_ID: &str = "User ID is required in the request.";
pub const MSG_TOKEN_MISSING: &str = "Token missing";
pub const MSG_TOKEN_INVALID: &str = "Invalid token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Caller input is incomplete; the message is safe to show.
    #[error("{0}")]
    Validation(&'static str),

    #[error("Username already taken.")]
    Conflict,

    /// Unknown user and wrong password are the same failure.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("User not found in cache.")]
    NotFound,

    #[error("Internal server error.")]
    Internal,
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Failures reported by a credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store's uniqueness constraint rejected the write.
    #[error("unique constraint violation")]
    Conflict,

    #[error("credential store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Failures reported by a session cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("session cache error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}
