//! Upstream HTTP capability
//!
//! The gateway never talks to reqwest directly. It hands an
//! `UpstreamRequest` to an `HttpFetcher` and gets back a JSON body or a
//! typed `FetchError`, which keeps the dispatch policy testable with a fake
//! fetcher.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::constants::DEFAULT_TIMEOUT_MS;
use crate::error::{FetchError, GatewayError};

/// Maximum number of bytes of an error body kept in `FetchError::Status`
const MAX_ERROR_BODY_BYTES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One live call, fully described
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// Service name, used for error messages and metrics
    pub service: String,
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl UpstreamRequest {
    pub fn get(service: &str, url: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            method: Method::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn post(service: &str, url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::get(service, url)
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Successful upstream answer
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// Issue one HTTP request and return the parsed JSON body
///
/// Implementations return `Ok` only for success statuses; anything else is
/// a `FetchError`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError>;
}

/// reqwest-backed fetcher
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(concat!("kakehashi/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()
            .map_err(|e| GatewayError::HttpClient(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
        let mut req = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        req = req.timeout(request.timeout);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    service: request.service.clone(),
                    timeout_ms: request.timeout.as_millis() as u64,
                }
            } else if e.is_connect() {
                FetchError::Connection(format!("Failed to connect: {}", e))
            } else {
                FetchError::Connection(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_utf8(&mut body, MAX_ERROR_BODY_BYTES);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn truncate_utf8(s: &mut String, max_bytes: usize) {
    if s.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
