//! Data models for the Roblox web API.
//!
//! - [`primitives`] - Id newtypes like `GroupId` and `UserId`
//! - [`user`] - Users and the authenticated user
//! - [`group`] - Groups, roles, members and settings
//! - [`fetchable`] - Fetched / not-fetched attribute state

pub mod primitives;
pub mod user;
pub mod group;
pub mod fetchable;

// Re-export commonly used types
pub use primitives::*;
pub use user::*;
pub use group::*;
pub use fetchable::*;
