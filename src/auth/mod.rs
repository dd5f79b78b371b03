//! Accounts, bearer sessions and the profile cache.
//!
//! Flows are methods on [`AuthState`], which bundles the injected
//! collaborators: a [`CredentialStore`] (system of record), a [`SessionCache`]
//! (TTL store for password-free profiles), the Argon2id [`PasswordHasher`] and
//! the HS256 [`TokenService`].
//!
//! ## Cache-aside, write path only
//!
//! Login writes `profile:<id>` with the session TTL; profile lookup reads it.
//! A miss is a 404. Nothing repopulates the cache except the next login, so a
//! profile is unreachable between cache expiry and re-login even though the
//! account still exists.
//!
//! ## Non-enumeration
//!
//! Unknown usernames and wrong passwords fail with the same `InvalidCredentials`,
//! and expired, forged or malformed tokens all fail as `Invalid token`.

mod account;
mod cache;
mod error;
mod gate;
mod login;
mod password;
mod profile;
mod register;
mod state;
mod store;
mod token;
pub(crate) mod types;

pub use account::{Account, Profile};
pub use cache::{profile_key, RedisSessionCache, SessionCache};
pub use error::{AuthError, CacheError, StoreError};
pub use gate::{require_bearer, Principal};
pub use password::{PasswordError, PasswordHasher};
pub use state::{AuthConfig, AuthState};
pub use store::{CredentialStore, PgCredentialStore};
pub use token::{TokenError, TokenService};
pub use types::{ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

#[cfg(test)]
pub(crate) mod testing;
