//! Error types for the Roblox API client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error
//! side is the single [`Error`] enum below.

use std::fmt;

use thiserror::Error;

/// A specialized `Result` type for Roblox API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Roblox API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP request could not be performed (connection, TLS, body read...).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote answered with a status other than 200.
    #[error("HTTP {status} ({kind})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Classification of the status code
        kind: HttpErrorKind,
        /// Raw response body for debugging
        body: String,
    },

    /// Login verification failed during connect.
    ///
    /// When the failure came from the transport (a status, a timeout, a
    /// network error) that error is kept as the source.
    #[error("Authentication failed: {reason}")]
    Authentication {
        /// What went wrong
        reason: String,
        /// The underlying failure, if any
        #[source]
        source: Option<Box<Error>>,
    },

    /// A request was attempted without an open session.
    #[error("Not connected; call connect() first")]
    NotConnected,

    /// A lazily fetched attribute was read before it was fetched.
    #[error("Attribute `{0}` has not been fetched")]
    NotFetched(&'static str),

    /// A response was missing a field the caller depends on.
    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,
}

/// Classification of a non-success HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403, usually a missing or stale anti-forgery token
    Forbidden,
    /// 404
    NotFound,
    /// 429
    TooManyRequests,
    /// Any 5xx
    ServerError,
    /// Everything else that is not 200
    Other,
}

impl HttpErrorKind {
    /// Classify a status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::TooManyRequests,
            500..=599 => Self::ServerError,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::TooManyRequests => "too many requests",
            Self::ServerError => "server error",
            Self::Other => "unexpected status",
        };
        f.write_str(s)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// An authentication failure with no underlying error.
    pub fn authentication(reason: impl Into<String>) -> Self {
        Error::Authentication {
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap a transport failure that happened while logging in.
    pub(crate) fn authentication_caused_by(source: Error) -> Self {
        match source {
            Error::Authentication { .. } => source,
            other => Error::Authentication {
                reason: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Build an HTTP status error from a failed response.
    pub(crate) fn from_status(status: u16, body: impl Into<String>) -> Self {
        Error::Status {
            status,
            kind: HttpErrorKind::from_status(status),
            body: body.into(),
        }
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Authentication {
                source: Some(source),
                ..
            } => source.status(),
            _ => None,
        }
    }

    /// The status classification carried by this error, if any.
    pub fn kind(&self) -> Option<HttpErrorKind> {
        match self {
            Error::Status { kind, .. } => Some(*kind),
            Error::Authentication {
                source: Some(source),
                ..
            } => source.kind(),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout => true,
            Error::Status { kind, .. } => {
                matches!(kind, HttpErrorKind::TooManyRequests | HttpErrorKind::ServerError)
            }
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Authentication { .. } | Error::NotConnected => true,
            Error::Status { kind, .. } => {
                matches!(kind, HttpErrorKind::Unauthorized | HttpErrorKind::Forbidden)
            }
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Status { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status >= 500)
    }
}
