//! Request descriptor passed to the transport.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

/// A single outbound call: verb, resolved URL, optional JSON body and
/// optional header override.
///
/// When `headers` is `None` the session's default headers are used,
/// including the cookie and the anti-forgery token. An override replaces
/// them entirely.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) body: Option<Value>,
    pub(crate) headers: Option<HeaderMap>,
    pub(crate) timeout: Option<Duration>,
}

impl Request {
    /// Create a request with no body and default headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: None,
            timeout: None,
        }
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the session's default headers for this call.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Override the configured timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn with_optional(mut self, body: Option<Value>, headers: Option<HeaderMap>) -> Self {
        self.body = body;
        self.headers = headers;
        self
    }

    /// The HTTP verb.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The resolved URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let req = Request::new(Method::POST, "https://groups.roblox.com/v1/groups/1")
            .body(serde_json::json!({ "message": "hi" }))
            .timeout(Duration::from_secs(5));
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.url(), "https://groups.roblox.com/v1/groups/1");
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
        assert!(req.headers.is_none());
        assert_eq!(req.body.unwrap()["message"], "hi");
    }
}
