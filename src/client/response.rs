//! Response envelope returned by the transport.

use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// A completed HTTP exchange: status, body text and headers.
///
/// The body is parsed as JSON on the first call to [`json`](Self::json)
/// and the parsed value is reused afterwards.
#[derive(Debug)]
pub struct BloxResponse {
    status: u16,
    text: String,
    headers: HeaderMap,
    json: OnceCell<Value>,
}

impl BloxResponse {
    /// Build an envelope from its parts.
    pub fn new(status: u16, text: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            status,
            text: text.into(),
            headers,
            json: OnceCell::new(),
        }
    }

    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;
        Ok(Self::new(status, text, headers))
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Only 200 counts as success.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Raw body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not valid JSON.
    pub fn json(&self) -> Result<&Value> {
        self.json
            .get_or_try_init(|| serde_json::from_str(&self.text))
            .map_err(Error::from)
    }

    /// Deserialize the body into a typed value.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(self.json()?)?)
    }

    pub(crate) fn into_error(self) -> Error {
        Error::from_status(self.status, self.text)
    }
}
