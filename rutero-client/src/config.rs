//! Client configuration

use std::time::Duration;

use crate::api::RestPaymentApi;
use crate::error::ClientResult;

/// Freshness window for cached history pages (5 minutes)
pub const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(300);

/// Client configuration for connecting to the payment service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Freshness window for cached history pages
    pub history_ttl: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            history_ttl: DEFAULT_HISTORY_TTL,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the history cache freshness window
    pub fn with_history_ttl(mut self, ttl: Duration) -> Self {
        self.history_ttl = ttl;
        self
    }

    /// Create a REST payment API from this configuration
    pub fn build_api(&self) -> ClientResult<RestPaymentApi> {
        RestPaymentApi::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
