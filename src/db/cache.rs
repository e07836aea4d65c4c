//! Time-boxed cache for the aggregated subscriber total.
//!
//! The count and its expiry are written together as one serialized [`CachedTotal`] under a
//! single key, so a reader never sees a count paired with another write's expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::constants::{CACHE_KEY, CACHE_TTL};
use crate::db::{CacheResult, CacheStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTotal {
    pub count: u64,
    pub expiry: DateTime<Utc>,
}

impl CachedTotal {
    /// An entry is only usable strictly before its expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}

#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn CacheStore>,
    key: String,
    ttl: TimeDelta,
}

impl TtlCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_ttl(store, CACHE_TTL)
    }

    pub fn with_ttl(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store,
            key: CACHE_KEY.to_string(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub async fn read(&self) -> CacheResult<Option<u64>> {
        self.read_at(Utc::now()).await
    }

    /// Returns the stored count if an entry exists and `now` is before its expiry.
    ///
    /// Entries that cannot be decoded count as a miss rather than an error.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn read_at(&self, now: DateTime<Utc>) -> CacheResult<Option<u64>> {
        let Some(raw) = self.store.load(&self.key).await? else {
            tracing::debug!("cache empty");
            return Ok(None);
        };

        let entry = match serde_json::from_str::<CachedTotal>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable cache entry, treating as expired");
                return Ok(None);
            }
        };

        if !entry.is_valid_at(now) {
            tracing::debug!(expiry = %entry.expiry, "cache entry expired");
            return Ok(None);
        }

        tracing::debug!(count = entry.count, expiry = %entry.expiry, "cache hit");
        Ok(Some(entry.count))
    }

    pub async fn write(&self, count: u64) -> CacheResult<CachedTotal> {
        self.write_at(count, Utc::now()).await
    }

    /// Overwrites the stored entry with `count`, valid until `now + ttl`
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn write_at(&self, count: u64, now: DateTime<Utc>) -> CacheResult<CachedTotal> {
        let entry = CachedTotal {
            count,
            expiry: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.store
            .store(&self.key, serde_json::to_string(&entry)?)
            .await?;

        Ok(entry)
    }

    /// Raw stored record, if any and if decodable
    #[cfg(test)]
    pub async fn peek(&self) -> CacheResult<Option<CachedTotal>> {
        Ok(self
            .store
            .load(&self.key)
            .await?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }
}
