//! Memory cache implementation
//!
//! `ResultCache` is a TTL-keyed store backed by moka. It answers
//! `get_or_compute`: a valid entry is returned without running the
//! computation; otherwise the computation runs and only a successful
//! result is stored.
//!
//! Concurrency: the store itself is safe for concurrent use, but there is
//! no single-flight guarantee. Two callers that miss on the same key at the
//! same time will both run their computation and the later insert wins.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::notification::RemovalCause;
use moka::Expiry;

use super::config::CacheConfig;
use super::entry::{CacheEntry, CacheKey};
use super::stats::{CacheStats, CacheStatsTracker};

/// Per-entry expiration driven by the TTL stored in each entry
struct EntryExpiry;

impl<V> Expiry<CacheKey, CacheEntry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// ResultCache wraps moka with per-entry TTLs
pub struct ResultCache<V> {
    cache: moka::future::Cache<CacheKey, CacheEntry<V>>,
    stats: Arc<CacheStatsTracker>,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new ResultCache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.max_entries)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let stats = Arc::new(CacheStatsTracker::new());
        let stats_clone = stats.clone();

        let cache = moka::future::Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .eviction_listener(move |_key, _value, cause| {
                // Explicit invalidations are not evictions
                if matches!(cause, RemovalCause::Size | RemovalCause::Expired) {
                    stats_clone.increment_evictions();
                }
            })
            .build();

        Self { cache, stats }
    }

    /// Return the cached value for `key` or compute, store and return it
    ///
    /// `compute` is not invoked while a valid entry exists. When `compute`
    /// returns an error nothing is stored, so the next call retries.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(key = %key, "cache miss");
        let value = compute().await?;
        self.cache
            .insert(key, CacheEntry::new(value.clone(), ttl))
            .await;
        Ok(value)
    }

    /// Get a valid entry's value, counting the hit or miss
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_valid() => {
                self.stats.increment_hits();
                Some(entry.value)
            }
            // Expired but not yet evicted by moka; the caller's insert replaces it
            Some(_) | None => {
                self.stats.increment_misses();
                None
            }
        }
    }

    /// Remove a single entry
    pub async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Forces moka to process pending evictions, expirations, and invalidations
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Current entry count (approximate due to eventual consistency)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.cache.entry_count())
    }
}
