//! User models.

use serde::{Deserialize, Serialize};

use super::primitives::UserId;

/// The user a session is logged in as, from `/my/settings/json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticatedUser {
    /// User id
    pub user_id: UserId,
    /// Display name
    pub name: String,
}

/// A Roblox user.
///
/// Endpoints disagree on casing (`Id`/`Username` on the legacy API,
/// `userId`/`username` on the groups API), so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    #[serde(alias = "Id", alias = "userId")]
    pub id: UserId,
    /// Username
    #[serde(alias = "Username")]
    pub username: String,
}
