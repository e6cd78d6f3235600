//! HTTP transport layer for the Roblox web API.
//!
//! This module provides the main entry point [`BloxClient`], the
//! per-request [`ApiUrl`] builder, the [`BloxResponse`] envelope and the
//! cursor pagination helpers.
//!
//! # Example
//!
//! ```no_run
//! use blox_rs::{BloxClient, ClientConfig};
//!
//! # async fn example() -> blox_rs::Result<()> {
//! let client = BloxClient::new(ClientConfig::default());
//! let me = client.connect("your-roblosecurity-cookie").await?;
//! println!("logged in as {} ({})", me.name, me.user_id);
//!
//! let settings = client
//!     .url("groups", "/v1/groups/%id%/settings", [("id", 1200769)])
//!     .get(None, None)
//!     .await?;
//! println!("{}", settings.text());
//! # Ok(())
//! # }
//! ```

mod config;
mod endpoint;
mod http;
pub mod paginated;
mod request;
mod response;

pub use config::{ClientConfig, RetryPolicy};
pub use endpoint::{ApiUrl, EndpointTable};
pub use http::BloxClient;
pub use paginated::{read_pages, CursorPage, CursorStream};
pub use request::Request;
pub use response::BloxResponse;
pub(crate) use http::ClientInner;
