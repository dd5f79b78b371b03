//! Stateless bearer tokens (HS256 JWT).
//!
//! Nothing is stored server side: a token is valid while its signature matches
//! the process secret and `now < exp`. There is no revocation.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed, forged and expired tokens all look the same to callers.
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

pub(crate) fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Sign a token for `subject` that expires `ttl_seconds` from now.
    ///
    /// # Errors
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, subject: &str, ttl_seconds: u64) -> Result<String, TokenError> {
        self.issue_at(subject, now_unix_seconds(), ttl_seconds)
    }

    fn issue_at(
        &self,
        subject: &str,
        issued_at: u64,
        ttl_seconds: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the presented token and return its subject.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidToken` for any structural, signature or expiry defect.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        // jsonwebtoken accepts exp == now; the window is half-open.
        if data.claims.exp <= now_unix_seconds() || data.claims.sub.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        Ok(data.claims.sub)
    }
}
