//! Client configuration options.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::endpoint::EndpointTable;
use crate::{Error, Result};

/// Configuration for the Roblox client.
///
/// # Example
///
/// ```
/// use blox_rs::{ClientConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_retry(RetryPolicy::ReturnRetryResult);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-call timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// User-Agent header value
    pub user_agent: String,
    /// Headers every request starts from
    pub default_headers: HeaderMap,
    /// Endpoint host table
    pub endpoints: EndpointTable,
    /// What to do when a request comes back with a non-200 status
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("blox-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            default_headers: HeaderMap::new(),
            endpoints: EndpointTable::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request that does not override headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the name or value is not a valid header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidInput(format!("invalid value for header {name}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Replace the endpoint table.
    pub fn with_endpoints(mut self, endpoints: EndpointTable) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Behaviour of the transport when a request returns a non-200 status.
///
/// All policies other than [`RetryPolicy::Disabled`] refresh the
/// anti-forgery token and retry the request exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Retry once, but report the first failure even when the retry
    /// succeeds. A failed retry reports the retry's status instead.
    #[default]
    DiscardRetryResult,
    /// Retry once and hand a successful retry back to the caller.
    ReturnRetryResult,
    /// Never refresh or retry.
    Disabled,
}

impl RetryPolicy {
    /// Whether a failed request triggers a token refresh and a second attempt.
    pub fn retries(&self) -> bool {
        !matches!(self, RetryPolicy::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.retry, RetryPolicy::DiscardRetryResult);
        assert!(config.default_headers.is_empty());
        assert!(config.user_agent.starts_with("blox-rs/"));
    }

    #[test]
    fn test_with_header() {
        let config = ClientConfig::default()
            .with_header("Accept-Language", "en-US")
            .unwrap();
        assert_eq!(config.default_headers["accept-language"], "en-US");
    }

    #[test]
    fn test_with_header_rejects_bad_name() {
        let err = ClientConfig::default().with_header("bad name", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_retry_policy_retries() {
        assert!(RetryPolicy::DiscardRetryResult.retries());
        assert!(RetryPolicy::ReturnRetryResult.retries());
        assert!(!RetryPolicy::Disabled.retries());
    }
}
