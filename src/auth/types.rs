//! Request/response types for the auth flows.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::account::Profile;

/// Registration input. Every field is required; absent or empty fields are
/// rejected before the store is touched.
#[derive(ToSchema, Deserialize, Default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &redacted(self.password.as_ref()))
            .field("email", &self.email)
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &redacted(self.password.as_ref()))
            .finish()
    }
}

fn redacted(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[REDACTED]")
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: Profile,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Trimmed, non-empty string or nothing. The trimmed value is what gets stored
/// and looked up, so `alice` and `alice ` name the same account.
pub(super) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Passwords are taken verbatim; only an all-blank value counts as missing.
pub(super) fn present_secret(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
