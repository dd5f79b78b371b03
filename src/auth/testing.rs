//! In-memory collaborators with failure knobs and call counters.

use async_trait::async_trait;
use secrecy::SecretString;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::Mutex;

use super::{
    token::tests::service, Account, AuthConfig, AuthState, CacheError, CredentialStore,
    PasswordHasher, SessionCache, StoreError,
};

pub(crate) const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
pub(crate) struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
    pub(crate) lookups: AtomicUsize,
    pub(crate) inserts: AtomicUsize,
    /// Lookups fail with a backend error.
    pub(crate) fail_lookups: AtomicBool,
    /// Lookups miss even when the row exists, as if a concurrent insert landed
    /// between the check and the write.
    pub(crate) stale_lookups: AtomicBool,
}

impl MemoryCredentialStore {
    pub(crate) async fn put(&self, account: Account) {
        self.accounts
            .lock()
            .await
            .insert(account.username.clone(), account);
    }

    pub(crate) async fn get(&self, username: &str) -> Option<Account> {
        self.accounts.lock().await.get(username).cloned()
    }

    pub(crate) async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::backend("connection refused"));
        }
        if self.stale_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.get(username).await)
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&account.username) {
            return Err(StoreError::Conflict);
        }
        accounts.insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemorySessionCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
    pub(crate) writes: AtomicUsize,
    pub(crate) fail_writes: AtomicBool,
    pub(crate) fail_reads: AtomicBool,
}

impl MemorySessionCache {
    pub(crate) async fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).map(|(v, _)| v.clone())
    }

    pub(crate) async fn ttl(&self, key: &str) -> Option<u64> {
        self.entries.lock().await.get(key).map(|(_, ttl)| *ttl)
    }

    /// Drop an entry as if its TTL had run out.
    pub(crate) async fn expire(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::backend("cache unavailable"));
        }
        Ok(self.value(key).await)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::backend("cache unavailable"));
        }
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value.to_string(), ttl_seconds));
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::backend("cache unavailable"));
        }
        Ok(())
    }
}

pub(crate) struct Harness {
    pub(crate) store: Arc<MemoryCredentialStore>,
    pub(crate) cache: Arc<MemorySessionCache>,
    pub(crate) auth: Arc<AuthState>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let store = Arc::new(MemoryCredentialStore::default());
        let cache = Arc::new(MemorySessionCache::default());
        let auth = Arc::new(AuthState::new(
            AuthConfig::default(),
            store.clone(),
            cache.clone(),
            PasswordHasher::default(),
            service(TEST_SECRET),
        ));
        Self { store, cache, auth }
    }

    /// Store an account with a real Argon2id hash of `password`.
    pub(crate) async fn seed(
        &self,
        id: &str,
        name: &str,
        username: &str,
        password: &str,
        email: &str,
    ) -> anyhow::Result<()> {
        let password_hash =
            PasswordHasher::default().hash(&SecretString::from(password.to_string()))?;
        self.store
            .put(Account {
                id: id.to_string(),
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
                email: email.to_string(),
            })
            .await;
        Ok(())
    }

    /// The account from the login example: id 123, username `test`.
    pub(crate) async fn seed_john(&self) -> anyhow::Result<()> {
        self.seed("123", "John Doe", "test", "correctpassword", "test@example.com")
            .await
    }
}
