//! Authentication and session management for the Roblox web API.
//!
//! Roblox authenticates browser-style: a `.ROBLOSECURITY` cookie identifies
//! the user, and mutating requests must carry an `X-CSRF-TOKEN` header whose
//! value is scraped from a served page. [`Session`] owns both, along with
//! the underlying network session.
//!
//! ```no_run
//! use blox_rs::BloxClient;
//!
//! # async fn example() -> blox_rs::Result<()> {
//! let client = BloxClient::login(std::env::var("ROBLOSECURITY").unwrap()).await?;
//! println!("csrf token present: {}", client.session().csrf_token().await.is_some());
//! # Ok(())
//! # }
//! ```

mod session;

pub use session::{extract_csrf_token, Session, CSRF_HEADER, SECURITY_COOKIE};
