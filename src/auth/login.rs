//! Login: verify credentials, issue a bearer token, write the profile to the cache.
//!
//! A failed cache write fails the whole login and the already signed token is
//! dropped. A client that can log in can always read its profile while the
//! session lasts.

use secrecy::SecretString;
use tracing::{debug, error, instrument};

use super::{
    cache::profile_key,
    error::{AuthError, MSG_LOGIN_FIELDS},
    password::verify_blocking,
    state::AuthState,
    types::{present, present_secret, LoginRequest, LoginResponse},
};

impl AuthState {
    /// # Errors
    /// `Validation` for missing fields, `InvalidCredentials` for an unknown
    /// user or a wrong password, `Internal` for store, hash, signing or cache failures.
    #[instrument(skip(self, request), fields(username = request.username.as_deref()))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let (Some(username), Some(password)) = (
            present(request.username.as_deref()),
            present_secret(request.password.as_deref()),
        ) else {
            return Err(AuthError::Validation(MSG_LOGIN_FIELDS));
        };

        let account = match self.store().find_by_username(username).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!("Unknown username");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!("Error fetching user: {e}");
                return Err(AuthError::Internal);
            }
        };

        let matches = verify_blocking(
            self.hasher(),
            SecretString::from(password.to_string()),
            account.password_hash.clone(),
        )
        .await?;
        if !matches {
            debug!("Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let user = account.profile();
        let ttl = self.config().session_ttl_seconds();

        let token = self.tokens().issue(&user.id, ttl).map_err(|e| {
            error!("Error signing token: {e}");
            AuthError::Internal
        })?;

        let cached = serde_json::to_string(&user).map_err(|e| {
            error!("Error serializing profile: {e}");
            AuthError::Internal
        })?;

        if let Err(e) = self.cache().set(&profile_key(&user.id), &cached, ttl).await {
            error!("Error caching profile: {e}");
            return Err(AuthError::Internal);
        }

        debug!("Login successful");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user,
        })
    }
}
