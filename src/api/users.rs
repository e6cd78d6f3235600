//! Users service.

use std::sync::Arc;

use crate::client::{ApiUrl, ClientInner};
use crate::models::User;
use crate::Result;

/// Service for user lookups.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let user = client.users().by_username("builderman").await?;
/// println!("{} has id {}", user.username, user.id);
/// # Ok(())
/// # }
/// ```
pub struct UsersService {
    inner: Arc<ClientInner>,
}

impl UsersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Look a user up by username.
    ///
    /// The name is percent-encoded into the query string.
    pub async fn by_username(&self, username: &str) -> Result<User> {
        ApiUrl::new(
            self.inner.clone(),
            "default",
            "/users/get-by-username",
            None::<(&str, u8)>,
        )
        .with_query("username", username)?
        .get(None, None)
        .await?
        .json_as()
    }
}
