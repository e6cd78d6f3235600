//! # blox-rs
//!
//! An async Rust client for the Roblox groups web API.
//!
//! The crate authenticates the way a browser does, with a `.ROBLOSECURITY`
//! cookie plus an anti-forgery token scraped from a served page, and exposes
//! group, role, member and user resources on top of a small transport layer.
//!
//! ## Features
//!
//! - **Authentication**: cookie login with automatic `X-CSRF-TOKEN` scraping
//! - **Transport**: one client for every call, with a single token-refresh retry
//! - **Endpoints**: short keys (`groups`, `friends`, ...) and `%name%` path templates
//! - **Pagination**: cursor-paginated lists collected eagerly or streamed lazily
//! - **Groups**: names, roles, settings, members and join requests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blox_rs::{BloxClient, GroupId};
//!
//! #[tokio::main]
//! async fn main() -> blox_rs::Result<()> {
//!     let client = BloxClient::login(std::env::var("ROBLOSECURITY").unwrap()).await?;
//!
//!     let group = GroupId::new(1200769);
//!     let roles = client.groups().roles(group).await?;
//!     for role in roles {
//!         println!("{} (rank {})", role.name, role.rank);
//!     }
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Raw Requests
//!
//! ```rust,no_run
//! # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
//! let response = client
//!     .url("groups", "/v1/groups/%id%/status", [("id", 1200769)])
//!     .patch(Some(serde_json::json!({ "message": "hello" })), None)
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, HttpErrorKind, Result};
pub use models::{GroupId, UserId};
pub use client::{
    ApiUrl, BloxClient, BloxResponse, ClientConfig, EndpointTable, Request, RetryPolicy,
};
pub use auth::Session;

/// Prelude module for convenient imports.
///
/// ```rust
/// use blox_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, HttpErrorKind, Result};
    pub use crate::models::{
        AuthenticatedUser, Fetchable, GroupId, GroupInfo, GroupMember, GroupRole,
        GroupSettings, User, UserId,
    };
    pub use crate::client::{
        ApiUrl, BloxClient, BloxResponse, ClientConfig, CursorStream, EndpointTable, Request,
        RetryPolicy,
    };
    pub use crate::api::{Group, GroupsService, UsersService};
    pub use crate::auth::Session;
}
