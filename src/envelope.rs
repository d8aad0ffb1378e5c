//! Response envelope
//!
//! Every fetch returns an `Envelope<T>`: the domain payload plus provenance.
//! Callers that care whether data is real inspect `is_live_data` and
//! `source_label`; there is no error path for degraded data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every fallback source label
pub const FALLBACK_LABEL_PREFIX: &str = "local synthesis";

/// Reason used when a fallback is produced without one
const UNSPECIFIED_REASON: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub data: T,
    pub source_label: String,
    pub is_live_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// Wrap data returned by a live upstream service
    pub fn live(data: T, service_label: impl Into<String>) -> Self {
        Self {
            data,
            source_label: service_label.into(),
            is_live_data: true,
            fallback_reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Wrap locally synthesized data
    ///
    /// The reason is never empty, so a non-live envelope always explains
    /// itself.
    pub fn fallback(data: T, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            UNSPECIFIED_REASON.to_string()
        } else {
            reason
        };

        Self {
            data,
            source_label: format!("{} — {}", FALLBACK_LABEL_PREFIX, reason),
            is_live_data: false,
            fallback_reason: Some(reason),
            timestamp: Utc::now(),
        }
    }

}
