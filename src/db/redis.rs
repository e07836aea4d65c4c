use core::fmt;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::instrument;

use crate::db::{CacheResult, CacheStore};

const CANNOT_DEBUG: &str = "Debug called on ConnectionManager";

/// $: `redis-server --port 6380 --save "300 10" --appendonly yes --appendfsync everysec`
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CANNOT_DEBUG)
    }
}

impl RedisStore {
    #[instrument(skip(redis_url))]
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        tracing::debug!("connecting to redis server");

        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;

        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn store(&self, key: &str, value: String) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(key, value).await?;

        Ok(())
    }
}
