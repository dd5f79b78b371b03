//! Session cache: a TTL key-value store holding password-free profiles.
//!
//! The cache is written only by login and read only by profile lookup. It is
//! never populated on a read miss.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{info_span, Instrument};

use super::error::CacheError;

const PROFILE_KEY_PREFIX: &str = "profile:";

/// Cache key for an account's profile projection.
#[must_use]
pub fn profile_key(account_id: &str) -> String {
    format!("{PROFILE_KEY_PREFIX}{account_id}")
}

#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, overwriting any previous entry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

#[derive(Clone)]
pub struct RedisSessionCache {
    manager: ConnectionManager,
}

impl RedisSessionCache {
    /// Open a managed (auto-reconnecting) connection.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(CacheError::backend)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(CacheError::backend)?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let span = info_span!("cache.command", db.system = "redis", db.operation = "GET");
        let mut conn = self.manager.clone();
        let value: Option<String> = conn
            .get(key)
            .instrument(span)
            .await
            .map_err(CacheError::backend)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let span = info_span!("cache.command", db.system = "redis", db.operation = "SET");
        let mut conn = self.manager.clone();
        let _: () = conn
            .set_ex(key, value, ttl_seconds)
            .instrument(span)
            .await
            .map_err(CacheError::backend)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let span = info_span!("cache.command", db.system = "redis", db.operation = "PING");
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .instrument(span)
            .await
            .map_err(CacheError::backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_key_format() {
        assert_eq!(profile_key("123"), "profile:123");
    }
}
