//! Memory cache implementation
//!
//! This module provides in-memory cache implementations:
//! - `MemoryCache`: Bounded LRU cache backed by moka with per-entry TTL
//! - `NullCache`: No-op implementation for disabled caching

use async_trait::async_trait;
use moka::Expiry;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::CacheConfig;
use super::entry::{CacheEntry, CacheKey};
use super::stats::{CacheStats, CacheStatsTracker};
use super::traits::ResponseCache;

/// Per-entry expiry policy: each entry lives exactly its own TTL, and a
/// rewrite restarts the clock
struct EntryTtl;

impl Expiry<CacheKey, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// MemoryCache wraps moka for our ResponseCache trait
pub struct MemoryCache {
    cache: moka::future::Cache<CacheKey, CacheEntry>,
    stats: Arc<CacheStatsTracker>,
}

impl MemoryCache {
    /// Create a new MemoryCache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacity(config.max_entries)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        // Create stats tracker first so we can share it with the eviction listener
        let stats = Arc::new(CacheStatsTracker::new());
        let stats_clone = stats.clone();

        let cache = moka::future::Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .eviction_listener(move |_key, _value, cause| {
                // Explicit removals and replacements are not TTL evictions
                if matches!(cause, moka::notification::RemovalCause::Expired) {
                    stats_clone.increment_expired();
                }
            })
            .build();

        Self { cache, stats }
    }

    /// Get an entry, lazily evicting it if its TTL has elapsed
    pub async fn get_entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_expired() => {
                // moka's timer wheel has not caught up yet
                self.cache.invalidate(key).await;
                self.stats.increment_expired();
                self.stats.increment_misses();
                None
            }
            Some(entry) => {
                self.stats.increment_hits();
                Some(entry)
            }
            None => {
                self.stats.increment_misses();
                None
            }
        }
    }

    /// Insert or replace an entry
    pub async fn set_entry(&self, key: CacheKey, payload: Value, ttl: Duration) {
        self.cache.insert(key, CacheEntry::new(payload, ttl)).await;
    }

    /// Get current entry count (approximate due to eventual consistency)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.get_entry(key).await
    }

    async fn set(&self, key: CacheKey, payload: Value, ttl: Duration) {
        self.set_entry(key, payload, ttl).await
    }

    async fn delete(&self, key: &CacheKey) -> bool {
        self.cache
            .remove(key)
            .await
            .map_or(false, |entry| !entry.is_expired())
    }

    async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;
        self.stats.snapshot(self.cache.entry_count())
    }

    async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// NullCache is a no-op cache implementation used when caching is disabled
pub struct NullCache;

#[async_trait]
impl ResponseCache for NullCache {
    async fn get(&self, _key: &CacheKey) -> Option<CacheEntry> {
        None
    }

    async fn set(&self, _key: CacheKey, _payload: Value, _ttl: Duration) {}

    async fn delete(&self, _key: &CacheKey) -> bool {
        false
    }

    async fn clear(&self) {}

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// Build the cache selected by configuration
pub fn build_cache(config: &CacheConfig) -> Arc<dyn ResponseCache> {
    if config.enabled {
        Arc::new(MemoryCache::new(config))
    } else {
        Arc::new(NullCache)
    }
}
