use async_trait::async_trait;
use thiserror::Error;

pub mod cache;
pub mod memory;
pub mod redis;

pub mod prelude {
    pub use crate::db::cache::{CachedTotal, TtlCache};
    pub use crate::db::memory::MemoryStore;
    pub use crate::db::redis::RedisStore;
    pub use crate::db::{CacheErr, CacheResult, CacheStore};
}

/// Best-effort string key/value store backing the count cache
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> CacheResult<Option<String>>;
    async fn store(&self, key: &str, value: String) -> CacheResult<()>;
}

pub type CacheResult<T> = core::result::Result<T, CacheErr>;

#[derive(Debug, Error)]
pub enum CacheErr {
    #[error(transparent)]
    RedisClientError(#[from] ::redis::RedisError),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}
