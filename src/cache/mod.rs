//! Cache Store
//!
//! Maps a deterministic request fingerprint to a previously produced
//! envelope, its write time and its TTL. Expired entries are treated as
//! absent and evicted lazily on lookup.

pub mod config;
pub mod entry;
pub mod memory;
pub mod stats;
pub mod traits;

pub use config::CacheConfig;
pub use entry::{canonical_json, CacheEntry, CacheKey};
pub use memory::{build_cache, MemoryCache, NullCache};
pub use stats::CacheStats;
pub use traits::ResponseCache;
