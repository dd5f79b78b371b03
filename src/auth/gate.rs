//! Bearer-token gate for protected routes.
//!
//! Flow Overview: read `Authorization`, require the `Bearer <token>` shape,
//! verify the token as presented, and attach the subject to the request as a
//! [`Principal`]. No store or cache access happens here.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::{
    error::{AuthError, MSG_TOKEN_INVALID, MSG_TOKEN_MISSING},
    state::AuthState,
};

/// Verified caller identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub account_id: String,
}

/// Exactly `Bearer <token>`: case-sensitive scheme, one space, no blanks in the token.
fn bearer_token(header: &HeaderValue) -> Option<&str> {
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        None
    } else {
        Some(token)
    }
}

impl AuthState {
    /// Resolve an `Authorization` header value into a principal.
    ///
    /// # Errors
    /// `Unauthorized("Token missing")` for an absent or blank header, `Unauthorized("Invalid token")`
    /// for a malformed header or any verification failure.
    pub fn authorize(&self, header: Option<&HeaderValue>) -> Result<Principal, AuthError> {
        // An empty header carries no credential at all.
        let header = header
            .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
            .ok_or(AuthError::Unauthorized(MSG_TOKEN_MISSING))?;
        let token = bearer_token(header).ok_or(AuthError::Unauthorized(MSG_TOKEN_INVALID))?;

        match self.tokens().verify(token) {
            Ok(account_id) => Ok(Principal { account_id }),
            Err(e) => {
                debug!("Token rejected: {e}");
                Err(AuthError::Unauthorized(MSG_TOKEN_INVALID))
            }
        }
    }
}

/// Middleware guarding protected routes; see [`AuthState::authorize`].
pub async fn require_bearer(
    State(auth): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match auth.authorize(request.headers().get(AUTHORIZATION)) {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
