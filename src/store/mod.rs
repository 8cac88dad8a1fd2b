//! Local key-value persistence.
//!
//! The session record and the selected style each live under one key. The
//! backends differ only in where the bytes end up.

use std::future::Future;

use crate::config::{Config, StoreKind};
use crate::error::Result;

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// The backend selected by configuration.
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    File(FileStore),
    Redis(RedisStore),
}

impl Store {
    /// Opens the backend named by `config.session_store`.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = match config.session_store {
            StoreKind::Memory => Store::Memory(MemoryStore::new()),
            StoreKind::File => Store::File(FileStore::new(config.data_dir.clone())),
            StoreKind::Redis => Store::Redis(RedisStore::connect(&config.redis_url).await?),
        };
        tracing::info!("✅ Session store opened: {:?}", config.session_store);
        Ok(store)
    }
}

impl KeyValueStore for Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Store::Memory(s) => s.get(key).await,
            Store::File(s) => s.get(key).await,
            Store::Redis(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Store::Memory(s) => s.set(key, value).await,
            Store::File(s) => s.set(key, value).await,
            Store::Redis(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self {
            Store::Memory(s) => s.remove(key).await,
            Store::File(s) => s.remove(key).await,
            Store::Redis(s) => s.remove(key).await,
        }
    }
}
