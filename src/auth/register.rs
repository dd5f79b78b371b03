//! Registration: uniqueness check, hash, insert.
//!
//! The existence check and the insert are separate statements, so two
//! concurrent registrations can both pass the check. The store's unique
//! constraint decides; its rejection is reported as `Conflict`.

use secrecy::SecretString;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::{
    account::Account,
    error::{AuthError, StoreError, MSG_REGISTER_FIELDS},
    password::hash_blocking,
    state::AuthState,
    types::{present, present_secret, RegisterRequest},
};

impl AuthState {
    /// Create an account and return its new identifier.
    ///
    /// # Errors
    /// `Validation` for missing fields, `Conflict` for a taken username,
    /// `Internal` for store or hashing failures.
    #[instrument(skip(self, request), fields(username = request.username.as_deref()))]
    pub async fn register(&self, request: RegisterRequest) -> Result<String, AuthError> {
        let (Some(username), Some(name), Some(password), Some(email)) = (
            present(request.username.as_deref()),
            present(request.name.as_deref()),
            present_secret(request.password.as_deref()),
            present(request.email.as_deref()),
        ) else {
            return Err(AuthError::Validation(MSG_REGISTER_FIELDS));
        };

        match self.store().find_by_username(username).await {
            Ok(Some(_)) => {
                debug!("Username already taken");
                return Err(AuthError::Conflict);
            }
            Ok(None) => (),
            Err(e) => {
                error!("Error checking if user exists: {e}");
                return Err(AuthError::Internal);
            }
        }

        let password_hash =
            hash_blocking(self.hasher(), SecretString::from(password.to_string())).await?;

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            username: username.to_string(),
            password_hash,
            email: email.to_string(),
        };

        match self.store().insert(&account).await {
            Ok(()) => {
                debug!("User created");
                Ok(account.id)
            }
            Err(StoreError::Conflict) => {
                debug!("Username taken by a concurrent registration");
                Err(AuthError::Conflict)
            }
            Err(e) => {
                error!("Error inserting user: {e}");
                Err(AuthError::Internal)
            }
        }
    }
}
