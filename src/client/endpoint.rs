//! Endpoint resolution and the per-request URL builder.
//!
//! Roblox spreads its API across several hosts (`groups.roblox.com`,
//! `friends.roblox.com`, ...). Callers refer to them by a short key and a
//! path template with `%name%` placeholders:
//!
//! ```
//! use blox_rs::EndpointTable;
//!
//! let table = EndpointTable::default();
//! let url = table.resolve("groups", "/v1/groups/%id%/roles", [("id", 42)]);
//! assert_eq!(url, "https://groups.roblox.com/v1/groups/42/roles");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use super::request::Request;
use super::response::BloxResponse;
use super::ClientInner;
use crate::Result;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%[A-Za-z_][A-Za-z0-9_]*%").expect("placeholder pattern is valid"));

/// Mapping from short endpoint keys to hosts.
///
/// Lookup is case-insensitive. Keys that are not in the table are used
/// verbatim as the host, so a fully-qualified host can be passed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    scheme: String,
    hosts: HashMap<String, String>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        let hosts = [
            ("groups", "groups.roblox.com"),
            ("friends", "friends.roblox.com"),
            ("users", "users.roblox.com"),
            ("www", "www.roblox.com"),
            ("default", "api.roblox.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            scheme: "https".to_string(),
            hosts,
        }
    }
}

impl EndpointTable {
    /// Create the standard Roblox table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL scheme (defaults to `https`).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Add or replace the host for a key.
    pub fn with_host(mut self, key: &str, host: impl Into<String>) -> Self {
        self.hosts.insert(key.to_lowercase(), host.into());
        self
    }

    /// Point every known key at the same host. Handy for mock servers.
    pub fn with_all_hosts(mut self, host: impl Into<String>) -> Self {
        let host = host.into();
        for value in self.hosts.values_mut() {
            value.clone_from(&host);
        }
        self
    }

    /// The URL scheme in use.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Look up the host for a key, falling back to the key itself.
    pub fn host<'a>(&'a self, key: &'a str) -> &'a str {
        self.hosts
            .get(&key.to_lowercase())
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Resolve an endpoint key and a path template into a full URL.
    ///
    /// Each `(name, value)` pair replaces the first remaining `%name%` in the
    /// template, in the order given. Placeholders without a value are left
    /// untouched.
    pub fn resolve<'a, V, I>(&self, endpoint: &str, template: &str, params: I) -> String
    where
        V: fmt::Display,
        I: IntoIterator<Item = (&'a str, V)>,
    {
        let mut path = template.to_string();
        for (name, value) in params {
            path = path.replacen(&format!("%{name}%"), &value.to_string(), 1);
        }
        format!("{}://{}{}", self.scheme, self.host(endpoint), path)
    }
}

/// A resolved URL bound to a client, with one method per HTTP verb.
///
/// Obtained from [`BloxClient::url`](crate::BloxClient::url). The URL is
/// resolved once at construction.
///
/// ```no_run
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let roles = client
///     .url("groups", "/v1/groups/%id%/roles", [("id", 1200769)])
///     .get(None, None)
///     .await?;
/// println!("{}", roles.json()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiUrl {
    inner: Arc<ClientInner>,
    url: String,
}

impl ApiUrl {
    pub(crate) fn new<'a, V, I>(
        inner: Arc<ClientInner>,
        endpoint: &str,
        template: &str,
        params: I,
    ) -> Self
    where
        V: fmt::Display,
        I: IntoIterator<Item = (&'a str, V)>,
    {
        let url = inner.config.endpoints.resolve(endpoint, template, params);
        Self { inner, url }
    }

    /// The resolved URL.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Whether any `%name%` placeholder survived resolution.
    pub fn has_unresolved_placeholders(&self) -> bool {
        PLACEHOLDER.is_match(&self.url)
    }

    /// Return a copy with a query parameter appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`](crate::Error::UrlParse) if the resolved
    /// URL is not a valid absolute URL.
    pub fn with_query(&self, key: &str, value: &str) -> Result<Self> {
        let mut url = url::Url::parse(&self.url)?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(Self {
            inner: self.inner.clone(),
            url: url.into(),
        })
    }

    /// Start a request descriptor for this URL, e.g. to set a timeout.
    pub fn request(&self, method: Method) -> Request {
        Request::new(method, self.url.clone())
    }

    /// Send a prepared request through the client's transport.
    pub async fn send(&self, request: Request) -> Result<BloxResponse> {
        self.inner.send(request).await
    }

    async fn call(
        &self,
        method: Method,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<BloxResponse> {
        let request = self.request(method).with_optional(body, headers);
        self.inner.send(request).await
    }

    /// `GET` this URL.
    pub async fn get(&self, body: Option<Value>, headers: Option<HeaderMap>) -> Result<BloxResponse> {
        self.call(Method::GET, body, headers).await
    }

    /// `POST` to this URL.
    pub async fn post(&self, body: Option<Value>, headers: Option<HeaderMap>) -> Result<BloxResponse> {
        self.call(Method::POST, body, headers).await
    }

    /// `PUT` to this URL.
    pub async fn put(&self, body: Option<Value>, headers: Option<HeaderMap>) -> Result<BloxResponse> {
        self.call(Method::PUT, body, headers).await
    }

    /// `DELETE` this URL.
    pub async fn delete(&self, body: Option<Value>, headers: Option<HeaderMap>) -> Result<BloxResponse> {
        self.call(Method::DELETE, body, headers).await
    }

    /// `PATCH` this URL.
    pub async fn patch(&self, body: Option<Value>, headers: Option<HeaderMap>) -> Result<BloxResponse> {
        self.call(Method::PATCH, body, headers).await
    }

    /// `GET` this URL with an explicit timeout.
    pub async fn get_with_timeout(&self, timeout: Duration) -> Result<BloxResponse> {
        self.inner
            .send(self.request(Method::GET).timeout(timeout))
            .await
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl fmt::Debug for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiUrl").field(&self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_resolves_host() {
        let table = EndpointTable::default();
        assert_eq!(
            table.resolve("friends", "/v1/users/%id%/friends", [("id", 7)]),
            "https://friends.roblox.com/v1/users/7/friends"
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = EndpointTable::default();
        assert_eq!(table.host("GROUPS"), "groups.roblox.com");
        assert_eq!(table.host("Default"), "api.roblox.com");
    }

    #[test]
    fn test_unknown_key_passes_through() {
        let table = EndpointTable::default();
        for key in ["www.example.com", "catalog.roblox.com", "localhost:8080"] {
            assert_eq!(table.host(key), key);
            assert_eq!(table.resolve(key, "/x", None::<(&str, u8)>), format!("https://{key}/x"));
        }
    }

    #[test]
    fn test_placeholder_replaced_once() {
        let table = EndpointTable::default();
        let url = table.resolve("groups", "/v1/groups/%id%/users/%id%/%other%", [("id", 42)]);
        assert_eq!(url, "https://groups.roblox.com/v1/groups/42/users/%id%/%other%");
    }

    #[test]
    fn test_placeholders_in_supplied_order() {
        let table = EndpointTable::default();
        let url = table.resolve(
            "groups",
            "/v1/groups/%group%/roles/%role%",
            [("role", "9"), ("group", "3")],
        );
        assert_eq!(url, "https://groups.roblox.com/v1/groups/3/roles/9");
    }

    #[test]
    fn test_with_scheme_and_host() {
        let table = EndpointTable::default()
            .with_scheme("http")
            .with_host("Groups", "127.0.0.1:9000");
        assert_eq!(
            table.resolve("groups", "/v1/groups/%id%", [("id", 1)]),
            "http://127.0.0.1:9000/v1/groups/1"
        );
        assert_eq!(table.host("www"), "www.roblox.com");
    }

    #[test]
    fn test_with_all_hosts() {
        let table = EndpointTable::default().with_all_hosts("mock:1");
        assert_eq!(table.host("groups"), "mock:1");
        assert_eq!(table.host("www"), "mock:1");
        assert_eq!(table.host("default"), "mock:1");
    }

    #[test]
    fn test_placeholder_pattern() {
        assert!(PLACEHOLDER.is_match("https://a/v1/%id%"));
        assert!(!PLACEHOLDER.is_match("https://a/v1/42?q=a%20b"));
    }
}
