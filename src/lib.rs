//! # Cachet
//!
//! `cachet` registers accounts, signs people in with a password and keeps a
//! short-lived copy of their profile in Redis for bearer-token holders.
//!
//! ## Accounts
//!
//! Accounts live in `PostgreSQL`. Passwords are stored only as Argon2id PHC
//! strings and never leave the credential store.
//!
//! ## Sessions
//!
//! A successful login returns an HS256 JWT naming the account and writes the
//! password-free profile to `profile:<id>` with the same lifetime. Profile reads
//! require a valid, unexpired bearer token and are served from the cache only;
//! once the entry expires the profile is a 404 until the next login.

pub mod auth;
pub mod cachet;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
