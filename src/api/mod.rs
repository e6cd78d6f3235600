//! API service modules for Roblox endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the Roblox web API.

mod groups;
mod users;

pub use groups::{Group, GroupsService};
pub use users::UsersService;
