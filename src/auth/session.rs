//! Session state for the Roblox web API.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::client::ClientConfig;
use crate::models::AuthenticatedUser;
use crate::{Error, Result};

/// Name of the authentication cookie.
pub const SECURITY_COOKIE: &str = ".ROBLOSECURITY";

/// Header carrying the anti-forgery token.
pub static CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

static CSRF_TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Roblox\.XsrfToken\.setToken\('([^']+)'\)").expect("token pattern is valid")
});

/// Authentication state shared by every request of a client.
///
/// Holds the cookies, the anti-forgery token, the default header set and
/// the underlying network session. Requests read the headers while a token
/// refresh may replace them, so all state sits behind a lock.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
    cookies: Vec<(String, SecretString)>,
    headers: HeaderMap,
    authenticated: bool,
    user: Option<AuthenticatedUser>,
}

impl Session {
    /// Create a closed session starting from the given default headers.
    pub fn new(default_headers: HeaderMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                http: None,
                timeout: None,
                cookies: Vec::new(),
                headers: default_headers,
                authenticated: false,
                user: None,
            })),
        }
    }

    /// Store a cookie and rebuild the `Cookie` header from all cookies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the key or value contains
    /// characters that cannot appear in a header.
    pub async fn set_cookie(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let key = key.into();
        let value = SecretString::from(value.into());
        if HeaderValue::from_str(&key).is_err()
            || HeaderValue::from_str(value.expose_secret()).is_err()
        {
            return Err(Error::InvalidInput(format!(
                "cookie {key} contains characters not allowed in a header"
            )));
        }

        let mut inner = self.inner.write().await;
        match inner.cookies.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => inner.cookies.push((key, value)),
        }

        let mut header = HeaderValue::from_str(&serialize_cookies(&inner.cookies))
            .map_err(|_| Error::InvalidInput("invalid cookie header".to_string()))?;
        header.set_sensitive(true);
        inner.headers.insert(COOKIE, header);
        Ok(())
    }

    /// The current anti-forgery token, if one has been scraped.
    pub async fn csrf_token(&self) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .headers
            .get(&CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// A snapshot of the default headers.
    pub async fn headers(&self) -> HeaderMap {
        self.inner.read().await.headers.clone()
    }

    /// Whether login verification succeeded and the session is live.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.authenticated
    }

    /// Whether the underlying network session is open.
    pub async fn is_open(&self) -> bool {
        self.inner.read().await.http.is_some()
    }

    /// The user verified at connect time.
    pub async fn user(&self) -> Option<AuthenticatedUser> {
        self.inner.read().await.user.clone()
    }

    /// Open the underlying network session.
    pub(crate) async fn open(&self, config: &ClientConfig) -> Result<()> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        let mut inner = self.inner.write().await;
        inner.http = Some(http);
        inner.timeout = config.timeout;
        Ok(())
    }

    /// The network session, or [`Error::NotConnected`] when closed.
    pub(crate) async fn http(&self) -> Result<reqwest::Client> {
        self.inner
            .read()
            .await
            .http
            .clone()
            .ok_or(Error::NotConnected)
    }

    /// Scrape a fresh anti-forgery token from `home_url`.
    ///
    /// The page is fetched without the session's headers. Returns `true`
    /// when the stored token changed. A page without a token leaves the
    /// current one in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if the session is closed, or a
    /// network error if the page cannot be fetched.
    pub async fn refresh_token(&self, home_url: &str) -> Result<bool> {
        let (http, timeout) = {
            let inner = self.inner.read().await;
            let http = inner.http.clone().ok_or(Error::NotConnected)?;
            (http, inner.timeout)
        };

        tracing::debug!(url = home_url, "Refreshing anti-forgery token");
        let mut request = http.get(home_url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let body = request.send().await?.text().await?;

        Ok(self.apply_token_from(&body).await)
    }

    /// Store the token found in `body` if it differs from the current one.
    pub(crate) async fn apply_token_from(&self, body: &str) -> bool {
        let Some(token) = extract_csrf_token(body) else {
            tracing::debug!("No anti-forgery token found on page");
            return false;
        };

        let mut inner = self.inner.write().await;
        let current = inner.headers.get(&CSRF_HEADER).and_then(|v| v.to_str().ok());
        if current == Some(token) {
            return false;
        }

        match HeaderValue::from_str(token) {
            Ok(value) => {
                inner.headers.insert(CSRF_HEADER.clone(), value);
                tracing::info!(token_len = token.len(), "Updated X-CSRF-TOKEN");
                true
            }
            Err(_) => {
                tracing::warn!("Scraped anti-forgery token is not a valid header value");
                false
            }
        }
    }

    pub(crate) async fn mark_authenticated(&self, user: AuthenticatedUser) {
        let mut inner = self.inner.write().await;
        inner.authenticated = true;
        inner.user = Some(user);
    }

    /// Close the network session if the session is authenticated.
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;
        if inner.authenticated {
            inner.http = None;
            inner.authenticated = false;
            inner.user = None;
            tracing::info!("Session closed");
        }
    }

    /// Drop the network session regardless of authentication state.
    pub(crate) async fn abort(&self) {
        let mut inner = self.inner.write().await;
        inner.http = None;
        inner.authenticated = false;
        inner.user = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookies", &"[REDACTED]")
            .field("csrf_token", &"[REDACTED]")
            .finish()
    }
}

/// Find the anti-forgery token embedded in a Roblox page.
///
/// ```
/// use blox_rs::auth::extract_csrf_token;
///
/// let page = "<script>Roblox.XsrfToken.setToken('TOK123');</script>";
/// assert_eq!(extract_csrf_token(page), Some("TOK123"));
/// ```
pub fn extract_csrf_token(body: &str) -> Option<&str> {
    CSRF_TOKEN_PATTERN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `k1=v1;k2=v2;` in insertion order.
fn serialize_cookies(cookies: &[(String, SecretString)]) -> String {
    cookies
        .iter()
        .map(|(k, v)| format!("{k}={};", v.expose_secret()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cookie_header(session: &Session) -> String {
        session.headers().await[COOKIE].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_cookie_serialization() {
        let session = Session::new(HeaderMap::new());
        session.set_cookie(SECURITY_COOKIE, "abc").await.unwrap();
        assert_eq!(cookie_header(&session).await, ".ROBLOSECURITY=abc;");

        session.set_cookie("X-Other", "z").await.unwrap();
        assert_eq!(cookie_header(&session).await, ".ROBLOSECURITY=abc;X-Other=z;");
    }

    #[tokio::test]
    async fn test_cookie_replace_keeps_order() {
        let session = Session::new(HeaderMap::new());
        session.set_cookie(SECURITY_COOKIE, "abc").await.unwrap();
        session.set_cookie("X-Other", "z").await.unwrap();
        session.set_cookie(SECURITY_COOKIE, "def").await.unwrap();
        assert_eq!(cookie_header(&session).await, ".ROBLOSECURITY=def;X-Other=z;");
    }

    #[tokio::test]
    async fn test_cookie_header_is_sensitive() {
        let session = Session::new(HeaderMap::new());
        session.set_cookie(SECURITY_COOKIE, "abc").await.unwrap();
        assert!(session.headers().await[COOKIE].is_sensitive());
    }

    #[tokio::test]
    async fn test_invalid_cookie_rejected() {
        let session = Session::new(HeaderMap::new());
        let err = session.set_cookie(SECURITY_COOKIE, "a\nb").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(session.headers().await.get(COOKIE).is_none());
    }

    #[test]
    fn test_extract_token() {
        let page = "var x = 1;\nRoblox.XsrfToken.setToken('TOK123');\n";
        assert_eq!(extract_csrf_token(page), Some("TOK123"));
        assert_eq!(extract_csrf_token("<html>nothing here</html>"), None);
    }

    #[test]
    fn test_extract_token_stops_at_quote() {
        let page = "Roblox.XsrfToken.setToken('a1b2'); foo('x')";
        assert_eq!(extract_csrf_token(page), Some("a1b2"));
    }

    #[tokio::test]
    async fn test_apply_token() {
        let session = Session::new(HeaderMap::new());
        assert!(session.apply_token_from("Roblox.XsrfToken.setToken('TOK123')").await);
        assert_eq!(session.csrf_token().await.as_deref(), Some("TOK123"));

        // same token again is not a change
        assert!(!session.apply_token_from("Roblox.XsrfToken.setToken('TOK123')").await);
    }

    #[tokio::test]
    async fn test_missing_token_leaves_existing() {
        let session = Session::new(HeaderMap::new());
        session.apply_token_from("Roblox.XsrfToken.setToken('OLD')").await;
        assert!(!session.apply_token_from("<html>maintenance</html>").await);
        assert_eq!(session.csrf_token().await.as_deref(), Some("OLD"));
    }

    #[tokio::test]
    async fn test_closed_session_is_not_connected() {
        let session = Session::new(HeaderMap::new());
        assert!(matches!(session.http().await, Err(Error::NotConnected)));
        assert!(matches!(
            session.refresh_token("http://127.0.0.1:1/").await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_close_requires_authentication() {
        let session = Session::new(HeaderMap::new());
        session.open(&ClientConfig::default()).await.unwrap();

        session.close().await;
        assert!(session.is_open().await, "unauthenticated close is a no-op");

        session
            .mark_authenticated(AuthenticatedUser {
                user_id: crate::models::UserId::new(1),
                name: "builderman".into(),
            })
            .await;
        session.close().await;
        assert!(!session.is_open().await);
        assert!(!session.is_authenticated().await);
    }

    #[test]
    fn test_session_debug_redacts_cookie() {
        let session = Session::new(HeaderMap::new());
        let debug_str = format!("{:?}", session);
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_headers_never_show_secret_in_debug() {
        let session = Session::new(HeaderMap::new());
        session.set_cookie(SECURITY_COOKIE, "super-secret-cookie").await.unwrap();
        let debug_str = format!("{:?}", session.headers().await);
        assert!(!debug_str.contains("super-secret-cookie"));
    }
}
