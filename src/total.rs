use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use crate::db::prelude::*;
use crate::util::youtube::YoutubeErr;

/// Anything that can report the current aggregate subscriber count
#[async_trait]
pub trait CountSource: Send + Sync {
    async fn total_subscribers(&self) -> Result<u64, YoutubeErr>;
}

/// Read-through composition of the count cache and the count source.
///
/// Concurrent misses are not de-duplicated: each one queries the source and overwrites the
/// cache independently.
#[derive(Clone)]
pub struct TotalResolver {
    source: Arc<dyn CountSource>,
    cache: TtlCache,
}

impl TotalResolver {
    pub fn new(source: Arc<dyn CountSource>, cache: TtlCache) -> Self {
        Self { source, cache }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self) -> ResolveResult<u64> {
        if let Some(count) = self.cache.read().await? {
            return Ok(count);
        }

        let count = self.source.total_subscribers().await?;

        // a failed write only costs us an extra fetch next time
        match self.cache.write(count).await {
            Ok(entry) => {
                tracing::info!(count, expiry = %entry.expiry, "cache updated");
            }
            Err(e) => {
                tracing::warn!(error = ?e, count, "failed to update cache");
            }
        }

        Ok(count)
    }
}

pub type ResolveResult<T> = core::result::Result<T, ResolveErr>;

#[derive(Debug, Error)]
pub enum ResolveErr {
    #[error("while fetching subscriber counts: {0}")]
    Source(#[from] YoutubeErr),

    #[error("while reading cached total: {0}")]
    Cache(#[from] CacheErr),
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeDelta, Utc};

    use crate::constants::CACHE_KEY;
    use crate::util::youtube::ChannelListResponse;

    /// Sums a fixed set of per-channel counts, counting how often it was asked
    struct FakeSource {
        counts: Vec<Option<&'static str>>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeSource {
        fn new(counts: &[Option<&'static str>]) -> Arc<Self> {
            Arc::new(Self {
                counts: counts.to_vec(),
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                counts: Vec::new(),
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CountSource for FakeSource {
        async fn total_subscribers(&self) -> Result<u64, YoutubeErr> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(YoutubeErr::FetchErr("503 Service Unavailable".into()));
            }

            let items: Vec<_> = self
                .counts
                .iter()
                .map(|c| match c {
                    Some(c) => serde_json::json!({ "statistics": { "subscriberCount": c } }),
                    None => serde_json::json!({ "statistics": {} }),
                })
                .collect();

            let body: ChannelListResponse =
                serde_json::from_value(serde_json::json!({ "items": items })).unwrap();
            Ok(body.total_subscribers())
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl CacheStore for ReadOnlyStore {
        async fn load(&self, key: &str) -> CacheResult<Option<String>> {
            self.0.load(key).await
        }

        async fn store(&self, _: &str, _: String) -> CacheResult<()> {
            Err(serde_json::from_str::<()>("read only").unwrap_err().into())
        }
    }

    async fn seed(store: &MemoryStore, count: u64, expiry_offset: TimeDelta) {
        let entry = CachedTotal {
            count,
            expiry: Utc::now() + expiry_offset,
        };
        store
            .store(CACHE_KEY, serde_json::to_string(&entry).unwrap())
            .await
            .unwrap();
    }

    const REPORTED: [Option<&str>; 5] = [
        Some("500000"),
        Some("500000"),
        Some("200000"),
        Some("0"),
        Some("0"),
    ];

    #[tokio::test]
    async fn test_valid_entry_skips_source() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 1_200_000, TimeDelta::minutes(5)).await;

        let source = FakeSource::new(&[Some("1")]);
        let resolver = TotalResolver::new(source.clone(), TtlCache::new(store));

        assert_eq!(resolver.resolve().await.unwrap(), 1_200_000);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches_and_rewrites() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 1_200_000, TimeDelta::minutes(-1)).await;

        let source = FakeSource::new(&REPORTED);
        let cache = TtlCache::new(store);
        let resolver = TotalResolver::new(source.clone(), cache.clone());

        let before = Utc::now();
        assert_eq!(resolver.resolve().await.unwrap(), 1_200_000);
        assert_eq!(source.calls(), 1);

        let entry = cache.peek().await.unwrap().unwrap();
        assert_eq!(entry.count, 1_200_000);
        assert!(entry.expiry >= before + TimeDelta::minutes(10));
        assert!(entry.expiry <= Utc::now() + TimeDelta::minutes(10));
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_once_then_hits() {
        let store = Arc::new(MemoryStore::new());
        let source = FakeSource::new(&[Some("10"), None, Some("5")]);
        let resolver = TotalResolver::new(source.clone(), TtlCache::new(store));

        assert_eq!(resolver.resolve().await.unwrap(), 15);
        assert_eq!(resolver.resolve().await.unwrap(), 15);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_source_failure_leaves_cache_untouched() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, 99, TimeDelta::minutes(-1)).await;

        let source = FakeSource::failing();
        let cache = TtlCache::new(store);
        let resolver = TotalResolver::new(source.clone(), cache.clone());

        assert!(matches!(
            resolver.resolve().await,
            Err(ResolveErr::Source(_))
        ));
        assert_eq!(source.calls(), 1);
        assert_eq!(cache.peek().await.unwrap().unwrap().count, 99);
    }

    #[tokio::test]
    async fn test_failed_write_still_returns_fresh_value() {
        let store = Arc::new(ReadOnlyStore(MemoryStore::new()));
        let source = FakeSource::new(&REPORTED);
        let resolver = TotalResolver::new(source.clone(), TtlCache::new(store));

        assert_eq!(resolver.resolve().await.unwrap(), 1_200_000);
        assert_eq!(resolver.resolve().await.unwrap(), 1_200_000);
        assert_eq!(source.calls(), 2);
    }
}
