use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::error::Result;
use crate::store::KeyValueStore;

/// Prefix applied to every key so the store can share a Redis database.
const KEY_PREFIX: &str = "dreamroom:";

/// Redis-backed key-value store.
#[derive(Clone)]
pub struct RedisStore {
    redis: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis server at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        tracing::info!("✅ Redis Connection Manager initialized");
        Ok(Self { redis })
    }

    fn key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut redis = self.redis.clone();
        let value: Option<String> = redis.get(Self::key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.set(Self::key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(Self::key(key)).await?;
        Ok(())
    }
}
