//! Argon2id password hashing.
//!
//! Digests are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification needs nothing but the stored value.

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

use super::error::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is malformed")]
    MalformedHash,
}

#[derive(Clone, Debug, Default)]
pub struct PasswordHasher {
    params: argon2::Params,
}

impl PasswordHasher {
    #[must_use]
    pub fn new(params: argon2::Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        )
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if the salt cannot be drawn or hashing fails.
    pub fn hash(&self, plaintext: &SecretString) -> Result<SecretString, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2()
            .hash_password(plaintext.expose_secret().as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();
        Ok(SecretString::from(digest))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable digest is an error.
    ///
    /// # Errors
    /// Returns `PasswordError::MalformedHash` if `digest` is not a PHC string.
    pub fn verify(
        &self,
        plaintext: &SecretString,
        digest: &SecretString,
    ) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(digest.expose_secret()).map_err(|_| PasswordError::MalformedHash)?;
        Ok(self
            .argon2()
            .verify_password(plaintext.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }
}

/// Hash off the async runtime; Argon2 is CPU bound. An aborted task is an
/// internal failure like any other.
pub(super) async fn hash_blocking(
    hasher: &PasswordHasher,
    plaintext: SecretString,
) -> Result<SecretString, AuthError> {
    let hasher = hasher.clone();
    match tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await {
        Ok(Ok(digest)) => Ok(digest),
        Ok(Err(e)) => {
            error!("Error hashing password: {e}");
            Err(AuthError::Internal)
        }
        Err(e) => {
            error!("Password hashing task aborted: {e}");
            Err(AuthError::Internal)
        }
    }
}

pub(super) async fn verify_blocking(
    hasher: &PasswordHasher,
    plaintext: SecretString,
    digest: SecretString,
) -> Result<bool, AuthError> {
    let hasher = hasher.clone();
    match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest)).await {
        Ok(Ok(matches)) => Ok(matches),
        Ok(Err(e)) => {
            error!("Error verifying password: {e}");
            Err(AuthError::Internal)
        }
        Err(e) => {
            error!("Password verification task aborted: {e}");
            Err(AuthError::Internal)
        }
    }
}
