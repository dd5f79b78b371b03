use crate::auth::{AuthError, AuthState, ErrorResponse, Principal, Profile};
use axum::{
    extract::{Extension, Path},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    get,
    path= "/users/profile/{id}",
    params(("id" = String, Path, description = "Account identifier")),
    responses (
        (status = 200, description = "Cached profile", body = Profile, content_type = "application/json"),
        (status = 400, description = "User ID is required", body = ErrorResponse),
        (status = 401, description = "Token missing or invalid", body = ErrorResponse),
        (status = 404, description = "Profile not in cache", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag= "users"
)]
#[instrument(skip(auth, principal))]
pub async fn profile(
    auth: Extension<Arc<AuthState>>,
    Extension(principal): Extension<Principal>,
    id: Path<String>,
) -> Result<Response, AuthError> {
    debug!("caller: {}", principal.account_id);

    let cached = auth.profile(Some(id.as_str())).await?;

    // Served as stored; login wrote it as JSON.
    Ok(([(CONTENT_TYPE, "application/json")], cached).into_response())
}

/// `/users/profile` with no id segment; the flow answers 400.
#[instrument(skip(auth, principal))]
pub async fn profile_without_id(
    auth: Extension<Arc<AuthState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Response, AuthError> {
    debug!("caller: {}", principal.account_id);

    let cached = auth.profile(None).await?;

    Ok(([(CONTENT_TYPE, "application/json")], cached).into_response())
}
