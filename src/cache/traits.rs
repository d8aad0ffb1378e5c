//! Cache trait definition
//!
//! `ResponseCache` is the seam between the gateway and its cache store. The
//! in-process `MemoryCache` implements it; a shared external store can be
//! substituted behind the same interface.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::entry::{CacheEntry, CacheKey};
use super::stats::CacheStats;

/// Cache trait for envelope stores
///
/// Operations are infallible: a cache that cannot answer behaves as a miss.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Get a cache entry by key
    /// Returns None if the key is not found or the entry has expired
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Store a payload for `ttl`
    /// Overwrites any existing entry and restarts its TTL clock
    async fn set(&self, key: CacheKey, payload: Value, ttl: Duration);

    /// Delete a cache entry by key
    /// Returns true if a live entry was removed
    async fn delete(&self, key: &CacheKey) -> bool;

    /// Clear all cache entries
    async fn clear(&self);

    /// Get cache statistics
    async fn stats(&self) -> CacheStats;

    /// Run pending async tasks (for caches that use async backends like moka)
    /// Default implementation is a no-op
    async fn run_pending_tasks(&self) {}
}
