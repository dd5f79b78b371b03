use crate::auth::{AuthError, AuthState, ErrorResponse, RegisterRequest, RegisterResponse};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/users",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "User created", body = RegisterResponse, content_type = "application/json"),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag= "users"
)]
#[instrument(skip(auth, payload))]
pub async fn register(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    // An absent or unparseable body is the same as one with every field missing.
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    debug!("request: {:?}", request);

    let user_id = auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}
