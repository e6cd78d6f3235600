//! Group, role, member and settings models.

use serde::{Deserialize, Serialize};

use super::primitives::{GroupId, UserId};

/// Basic group information from `/v1/groups/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    /// Group id
    pub id: GroupId,
    /// Group name
    #[serde(default)]
    pub name: Option<String>,
    /// Group description
    #[serde(default)]
    pub description: Option<String>,
    /// Number of members
    #[serde(default)]
    pub member_count: Option<u64>,
}

/// A role (rank) within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRole {
    /// Role id
    pub id: u64,
    /// Role name
    pub name: String,
    /// Rank number, 0-255
    pub rank: u8,
    /// Number of members holding this role
    #[serde(default)]
    pub member_count: Option<u64>,
}

/// A member of a group as listed by `/v1/groups/{id}/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    /// Member's user id
    pub user_id: UserId,
    /// Member's username
    pub username: String,
}

/// Group settings from `/v1/groups/{id}/settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupSettings {
    /// Whether joining needs approval
    pub is_approval_required: bool,
    /// Whether a premium membership is required to join
    pub is_builders_club_required: bool,
    /// Whether enemy declarations are allowed
    pub are_enemies_allowed: bool,
    /// Whether group funds are publicly visible
    pub are_group_funds_visible: bool,
    /// Whether group games are publicly visible
    pub are_group_games_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_deserialize() {
        let role: GroupRole = serde_json::from_str(
            r#"{"id": 11, "name": "Admin", "rank": 254, "memberCount": 3}"#,
        )
        .unwrap();
        assert_eq!(role.rank, 254);
        assert_eq!(role.member_count, Some(3));
    }

    #[test]
    fn test_settings_missing_fields_default() {
        let settings: GroupSettings =
            serde_json::from_str(r#"{"isApprovalRequired": true}"#).unwrap();
        assert!(settings.is_approval_required);
        assert!(!settings.are_enemies_allowed);
    }
}
