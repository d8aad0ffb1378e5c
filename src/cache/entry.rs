//! Cache key and entry types
//!
//! This module defines the core cache entry structures:
//! - `CacheKey`: Deterministic fingerprint of (domain, canonicalized parameters)
//! - `CacheEntry`: A cached envelope payload with its write time and TTL

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Cache key for identifying cached envelopes
///
/// The fingerprint is the hex SHA-256 of the canonical JSON form of the
/// request parameters, so logically identical requests collide regardless of
/// field presentation order.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Data domain (service name)
    pub domain: String,
    /// Hex SHA-256 of the canonicalized parameters
    pub fingerprint: String,
}

impl CacheKey {
    /// Derive the key for a domain and a serializable parameter set
    pub fn derive<P: Serialize + ?Sized>(domain: &str, params: &P) -> Self {
        let value = serde_json::to_value(params).unwrap_or(Value::Null);
        Self::from_value(domain, &value)
    }

    /// Derive the key from an already-built JSON parameter value
    pub fn from_value(domain: &str, params: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(params, &mut canonical);

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());

        Self {
            domain: domain.to_string(),
            fingerprint: hex::encode(hasher.finalize()),
        }
    }
}

/// Serialize a JSON value with object keys sorted at every depth
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.domain, self.fingerprint)
    }
}

/// A cached envelope
///
/// Entries are never mutated in place: every write replaces the entry and
/// restarts its TTL clock.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized envelope
    pub payload: Value,
    /// When this entry was written (monotonic clock)
    pub stored_at: Instant,
    /// How long this entry stays valid
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(payload: Value, ttl: Duration) -> Self {
        Self {
            payload,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Valid iff `now - stored_at < ttl`
    pub fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }

    /// Time left before expiry (zero once expired)
    pub fn remaining_ttl(&self) -> Duration {
        self.ttl.saturating_sub(self.stored_at.elapsed())
    }
}
