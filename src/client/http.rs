//! HTTP transport for the Roblox web API.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;

use super::config::{ClientConfig, RetryPolicy};
use super::endpoint::ApiUrl;
use super::request::Request;
use super::response::BloxResponse;
use crate::api::{Group, GroupsService, UsersService};
use crate::auth::{Session, SECURITY_COOKIE};
use crate::models::{AuthenticatedUser, GroupId};
use crate::{Error, Result};

/// The main client for interacting with the Roblox web API.
///
/// Every HTTP call made by this crate flows through one client. The
/// client owns a single [`Session`]; cloning the client shares it.
///
/// # Example
///
/// ```no_run
/// use blox_rs::{BloxClient, GroupId};
///
/// # async fn example() -> blox_rs::Result<()> {
/// let client = BloxClient::login("your-roblosecurity-cookie").await?;
///
/// let members = client.groups().members(GroupId::new(1200769)).await?;
/// println!("{} members", members.len());
///
/// client.close().await;
/// # Ok(())
/// # }
/// ```
pub struct BloxClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    /// Held for the whole connect sequence so logins never interleave.
    connecting: Mutex<()>,
}

impl BloxClient {
    /// Create a client that is not yet connected.
    pub fn new(config: ClientConfig) -> Self {
        let session = Session::new(config.default_headers.clone());
        Self {
            inner: Arc::new(ClientInner {
                session,
                config,
                connecting: Mutex::new(()),
            }),
        }
    }

    /// Create a client with default configuration and connect it.
    pub async fn login(roblosecurity: impl Into<String>) -> Result<Self> {
        Self::login_with_config(roblosecurity, ClientConfig::default()).await
    }

    /// Create a client with custom configuration and connect it.
    pub async fn login_with_config(
        roblosecurity: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = Self::new(config);
        client.connect(roblosecurity).await?;
        Ok(client)
    }

    /// Authenticate with a `.ROBLOSECURITY` cookie value.
    ///
    /// Opens the network session, scrapes an anti-forgery token and
    /// verifies the login against the settings endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if verification fails, in which
    /// case the session is left closed. The transport failure behind it,
    /// if any, is kept as the error source and its status stays reachable
    /// through [`Error::status`]. Returns [`Error::InvalidInput`] if the
    /// client is already connected. Concurrent calls run one at a time.
    pub async fn connect(&self, roblosecurity: impl Into<String>) -> Result<AuthenticatedUser> {
        self.inner.connect(roblosecurity.into()).await
    }

    /// Close the session. Later requests fail with [`Error::NotConnected`].
    pub async fn close(&self) {
        self.inner.session.close().await
    }

    /// Build a URL for an endpoint key and path template.
    ///
    /// See [`EndpointTable::resolve`](super::EndpointTable::resolve) for
    /// placeholder rules.
    pub fn url<'a, V, I>(&self, endpoint: &str, template: &str, params: I) -> ApiUrl
    where
        V: fmt::Display,
        I: IntoIterator<Item = (&'a str, V)>,
    {
        ApiUrl::new(self.inner.clone(), endpoint, template, params)
    }

    /// Perform a request against a fully resolved URL.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        headers: Option<HeaderMap>,
    ) -> Result<BloxResponse> {
        let request = Request::new(method, url).with_optional(body, headers);
        self.inner.send(request).await
    }

    /// Send a prepared request descriptor.
    pub async fn send(&self, request: Request) -> Result<BloxResponse> {
        self.inner.send(request).await
    }

    /// Manually refresh the anti-forgery token.
    pub async fn refresh_token(&self) -> Result<bool> {
        self.inner.refresh_token().await
    }

    /// Get the groups service.
    pub fn groups(&self) -> GroupsService {
        GroupsService::new(self.inner.clone())
    }

    /// Get the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self.inner.clone())
    }

    /// Get a handle on a group whose attributes are fetched on demand.
    pub fn group(&self, id: impl Into<GroupId>) -> Group {
        Group::new(self.inner.clone(), id.into())
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    pub(crate) async fn connect(&self, roblosecurity: String) -> Result<AuthenticatedUser> {
        let _connecting = self.connecting.lock().await;
        if self.session.is_authenticated().await {
            return Err(Error::InvalidInput("client is already connected".to_string()));
        }

        self.session.set_cookie(SECURITY_COOKIE, roblosecurity).await?;
        self.session.open(&self.config).await?;

        let user = match self.complete_login().await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                self.session.abort().await;
                return Err(Error::authentication_caused_by(e));
            }
        };

        self.session.mark_authenticated(user.clone()).await;
        tracing::info!(user_id = %user.user_id, "Connection established");
        Ok(user)
    }

    async fn complete_login(&self) -> Result<AuthenticatedUser> {
        self.refresh_token().await?;

        tracing::info!("Validating auth");
        let url = self.config.endpoints.resolve("www", "/my/settings/json", None::<(&str, u8)>);
        let response = self.send(Request::new(Method::GET, url)).await?;
        response.json_as::<AuthenticatedUser>().map_err(|e| {
            Error::authentication(format!("unexpected login verification response: {e}"))
        })
    }

    pub(crate) async fn refresh_token(&self) -> Result<bool> {
        let home = self.config.endpoints.resolve("www", "/", None::<(&str, u8)>);
        self.session.refresh_token(&home).await
    }

    /// Send a request, refreshing the token and retrying once on failure.
    pub(crate) async fn send(&self, request: Request) -> Result<BloxResponse> {
        let response = self.execute(&request).await?;
        if response.is_success() {
            return Ok(response);
        }

        if self.config.retry.retries() {
            tracing::debug!(
                status = response.status(),
                url = %request.url,
                "Request failed; refreshing token and retrying"
            );
            self.refresh_token().await?;

            let retried = self.execute(&request).await?;
            if !retried.is_success() {
                return Err(retried.into_error());
            }
            if self.config.retry == RetryPolicy::ReturnRetryResult {
                return Ok(retried);
            }
            tracing::warn!(
                status = response.status(),
                url = %request.url,
                "Retry succeeded but the original failure is reported"
            );
        }

        Err(response.into_error())
    }

    /// Perform one call with no status interpretation.
    async fn execute(&self, request: &Request) -> Result<BloxResponse> {
        let http = self.session.http().await?;

        let mut headers = match &request.headers {
            Some(headers) => headers.clone(),
            None => self.session.headers().await,
        };
        if request.method == Method::GET {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        tracing::debug!(method = %request.method, url = %request.url, "Requesting url");

        let mut builder = http
            .request(request.method.clone(), &request.url)
            .headers(headers);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout.or(self.config.timeout) {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        BloxResponse::from_reqwest(response).await
    }
}

impl Clone for BloxClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for BloxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloxClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_without_session_is_not_connected() {
        let client = BloxClient::new(ClientConfig::default());
        let err = client
            .request(Method::GET, "http://127.0.0.1:1/never", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_url_uses_configured_endpoints() {
        let config = ClientConfig::default().with_endpoints(
            crate::EndpointTable::default()
                .with_scheme("http")
                .with_host("groups", "localhost:1234"),
        );
        let client = BloxClient::new(config);
        let url = client.url("groups", "/v1/groups/%id%", [("id", 5)]);
        assert_eq!(url.as_str(), "http://localhost:1234/v1/groups/5");
        assert!(!url.has_unresolved_placeholders());
    }

    #[test]
    fn test_debug_redacts_session() {
        let client = BloxClient::new(ClientConfig::default());
        assert!(format!("{:?}", client).contains("REDACTED"));
    }
}
