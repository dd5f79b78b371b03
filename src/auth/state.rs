//! Auth configuration and the collaborator bundle every flow runs against.

use std::{fmt, sync::Arc};

use super::{
    cache::SessionCache, password::PasswordHasher, store::CredentialStore, token::TokenService,
};

const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }
}

impl AuthConfig {
    /// Token lifetime and profile cache TTL share one window.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }
}

/// Injected collaborators. Flows hold no other state.
pub struct AuthState {
    config: AuthConfig,
    store: Arc<dyn CredentialStore>,
    cache: Arc<dyn SessionCache>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn CredentialStore>,
        cache: Arc<dyn SessionCache>,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            hasher,
            tokens,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub(crate) fn cache(&self) -> &dyn SessionCache {
        self.cache.as_ref()
    }

    pub(super) fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub(super) fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
