// Error types module

use thiserror::Error;

/// Startup errors for the gateway
///
/// These are the only errors a caller can observe, and only while building a
/// gateway. Once constructed, every fetch returns an envelope.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Configuration errors (invalid YAML, missing env vars, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Failure of a single live upstream call
///
/// Transport failures (timeout, connection) and upstream failures (status,
/// malformed body) are absorbed by the gateway and turned into fallbacks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The call did not complete within the service timeout
    #[error("{service} timed out after {timeout_ms}ms")]
    Timeout { service: String, timeout_ms: u64 },

    /// Connection refused, DNS failure, TLS failure, ...
    #[error("connection failed: {0}")]
    Connection(String),

    /// The upstream answered with a non-success status
    #[error("upstream returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The body could not be parsed into the expected shape
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    /// No endpoint is configured for the service
    #[error("service not configured: {0}")]
    NotConfigured(String),
}

impl FetchError {
    /// Label used for fallback metrics
    pub fn metric_reason(&self) -> &'static str {
        match self {
            FetchError::NotConfigured(_) => "not_configured",
            _ => "error",
        }
    }

    /// True for transport-level failures (category a)
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Connection(_))
    }
}
