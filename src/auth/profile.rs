//! Profile lookup reads the session cache only.
//!
//! There is no fallback to the credential store: once `profile:<id>` expires
//! the profile answers 404 until the account logs in again.

use tracing::{debug, error, instrument};

use super::{
    cache::profile_key,
    error::{AuthError, MSG_PROFILE_ID},
    state::AuthState,
    types::present,
};

impl AuthState {
    /// Return the cached profile JSON exactly as login stored it.
    ///
    /// # Errors
    /// `Validation` for a missing id, `NotFound` on a cache miss,
    /// `Internal` if the cache cannot be read.
    #[instrument(skip(self))]
    pub async fn profile(&self, account_id: Option<&str>) -> Result<String, AuthError> {
        let Some(account_id) = present(account_id) else {
            return Err(AuthError::Validation(MSG_PROFILE_ID));
        };

        match self.cache().get(&profile_key(account_id)).await {
            Ok(Some(cached)) => Ok(cached),
            Ok(None) => {
                debug!("Profile not in cache");
                Err(AuthError::NotFound)
            }
            Err(e) => {
                error!("Error reading profile from cache: {e}");
                Err(AuthError::Internal)
            }
        }
    }
}
