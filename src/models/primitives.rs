//! Primitive types and newtypes for type-safe API interactions.
//!
//! Roblox identifies groups and users by numeric ids. Wrapping them keeps
//! a group id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed group id.
///
/// # Example
///
/// ```
/// use blox_rs::GroupId;
///
/// let group = GroupId::new(1200769);
/// assert_eq!(group.to_string(), "1200769");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    /// Create a new group id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GroupId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A strongly-typed user id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Create a new user id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_transparent() {
        let id: GroupId = serde_json::from_str("42").unwrap();
        assert_eq!(id, GroupId::new(42));
        assert_eq!(serde_json::to_string(&UserId::new(7)).unwrap(), "7");
    }
}
