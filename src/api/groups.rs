//! Groups service and the lazily populated [`Group`] handle.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::client::paginated::{page_data, read_pages, CursorStream, CURSOR_PARAM};
use crate::client::{ApiUrl, ClientInner};
use crate::models::{
    Fetchable, GroupId, GroupInfo, GroupMember, GroupRole, GroupSettings, User,
};
use crate::{Error, Result};

const MEMBERS_PATH: &str = "/v1/groups/%id%/users?sortOrder=Asc&limit=100";
const JOIN_REQUESTS_PATH: &str = "/v1/groups/%id%/join-requests?sortOrder=Asc&limit=100";

/// Service for group operations.
///
/// # Example
///
/// ```no_run
/// use blox_rs::GroupId;
///
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let group = GroupId::new(1200769);
///
/// let name = client.groups().name(group).await?;
/// let admin = client.groups().role_by_name(group, "Admin").await?;
/// let members = client.groups().members(group).await?;
/// println!("{name}: {} members, admin role {:?}", members.len(), admin.map(|r| r.rank));
/// # Ok(())
/// # }
/// ```
pub struct GroupsService {
    inner: Arc<ClientInner>,
}

impl GroupsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn url(&self, template: &str, group_id: GroupId) -> ApiUrl {
        ApiUrl::new(self.inner.clone(), "groups", template, [("id", group_id)])
    }

    /// Get basic group information.
    pub async fn info(&self, group_id: GroupId) -> Result<GroupInfo> {
        self.url("/v1/groups/%id%", group_id)
            .get(None, None)
            .await?
            .json_as()
    }

    /// Get the group's name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the response has no name.
    pub async fn name(&self, group_id: GroupId) -> Result<String> {
        self.info(group_id).await?.name.ok_or(Error::MissingField("name"))
    }

    /// List the group's roles.
    pub async fn roles(&self, group_id: GroupId) -> Result<Vec<GroupRole>> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(default)]
            roles: Vec<GroupRole>,
        }

        let response: Response = self
            .url("/v1/groups/%id%/roles", group_id)
            .get(None, None)
            .await?
            .json_as()?;
        Ok(response.roles)
    }

    /// Find a role by its exact name.
    pub async fn role_by_name(&self, group_id: GroupId, name: &str) -> Result<Option<GroupRole>> {
        Ok(self
            .roles(group_id)
            .await?
            .into_iter()
            .find(|role| role.name == name))
    }

    /// Get the group's settings.
    pub async fn settings(&self, group_id: GroupId) -> Result<GroupSettings> {
        self.url("/v1/groups/%id%/settings", group_id)
            .get(None, None)
            .await?
            .json_as()
    }

    /// List every member of the group, following all pages.
    pub async fn members(&self, group_id: GroupId) -> Result<Vec<GroupMember>> {
        let base = self.url(MEMBERS_PATH, group_id);
        read_pages(|cursor| page_url(&base, cursor), |page| map_data(page, member_from))
            .await
    }

    /// Stream the group's members lazily, one page at a time.
    pub fn members_stream(&self, group_id: GroupId) -> CursorStream<GroupMember> {
        CursorStream::from_url(self.url(MEMBERS_PATH, group_id))
    }

    /// List users waiting for approval to join.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the group does not require
    /// approval, since such a group has no join requests.
    pub async fn join_requests(&self, group_id: GroupId) -> Result<Vec<User>> {
        let settings = self.settings(group_id).await?;
        self.join_requests_with(group_id, &settings).await
    }

    async fn join_requests_with(
        &self,
        group_id: GroupId,
        settings: &GroupSettings,
    ) -> Result<Vec<User>> {
        if !settings.is_approval_required {
            return Err(Error::InvalidInput(format!(
                "group {group_id} does not require approval and has no join requests"
            )));
        }

        let base = self.url(JOIN_REQUESTS_PATH, group_id);
        read_pages(|cursor| page_url(&base, cursor), |page| map_data(page, requester_from))
            .await
    }

    /// Look a user up by name and return them as a member of the group.
    ///
    /// Membership itself is not checked.
    pub async fn member(&self, group_id: GroupId, username: &str) -> Result<GroupMember> {
        let user = super::UsersService::new(self.inner.clone())
            .by_username(username)
            .await?;
        tracing::debug!(group_id = %group_id, user_id = %user.id, "Resolved member");
        Ok(GroupMember {
            user_id: user.id,
            username: username.to_string(),
        })
    }
}

fn page_url(base: &ApiUrl, cursor: Option<&str>) -> Result<ApiUrl> {
    match cursor {
        Some(cursor) => base.with_query(CURSOR_PARAM, cursor),
        None => Ok(base.clone()),
    }
}

fn map_data<T>(page: &Value, map: fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    page_data(page)?.iter().map(map).collect()
}

fn member_from(item: &Value) -> Result<GroupMember> {
    Ok(GroupMember::deserialize(item)?)
}

fn requester_from(item: &Value) -> Result<User> {
    let user = item.get("user").ok_or(Error::MissingField("user"))?;
    Ok(User::deserialize(user)?)
}

/// A group whose name and settings are fetched on demand.
///
/// Accessors like [`name`](Self::name) fail with [`Error::NotFetched`]
/// until the matching `fetch_*` method has run.
///
/// ```no_run
/// # async fn example(client: blox_rs::BloxClient) -> blox_rs::Result<()> {
/// let mut group = client.group(blox_rs::GroupId::new(1200769));
/// assert!(group.name().is_err());
///
/// group.fetch_name().await?;
/// println!("{}", group.name()?);
/// # Ok(())
/// # }
/// ```
pub struct Group {
    inner: Arc<ClientInner>,
    id: GroupId,
    name: Fetchable<String>,
    settings: Fetchable<GroupSettings>,
}

impl Group {
    pub(crate) fn new(inner: Arc<ClientInner>, id: GroupId) -> Self {
        Self {
            inner,
            id,
            name: Fetchable::NotFetched,
            settings: Fetchable::NotFetched,
        }
    }

    fn service(&self) -> GroupsService {
        GroupsService::new(self.inner.clone())
    }

    /// The group id.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// The fetched name.
    pub fn name(&self) -> Result<&str> {
        self.name.get("name").map(String::as_str)
    }

    /// The fetched settings.
    pub fn settings(&self) -> Result<&GroupSettings> {
        self.settings.get("settings")
    }

    /// Fetch and store the group's name.
    pub async fn fetch_name(&mut self) -> Result<&str> {
        let name = self.service().name(self.id).await?;
        self.name.set(name);
        self.name()
    }

    /// Fetch and store the group's settings.
    pub async fn fetch_settings(&mut self) -> Result<&GroupSettings> {
        let settings = self.service().settings(self.id).await?;
        self.settings.set(settings);
        self.settings()
    }

    /// List the group's roles.
    pub async fn roles(&self) -> Result<Vec<GroupRole>> {
        self.service().roles(self.id).await
    }

    /// Find a role by name.
    pub async fn role(&self, name: &str) -> Result<Option<GroupRole>> {
        self.service().role_by_name(self.id, name).await
    }

    /// List every member.
    pub async fn members(&self) -> Result<Vec<GroupMember>> {
        self.service().members(self.id).await
    }

    /// List pending join requests, fetching settings first.
    pub async fn join_requests(&mut self) -> Result<Vec<User>> {
        self.fetch_settings().await?;
        let settings = self.settings.get("settings")?.clone();
        self.service().join_requests_with(self.id, &settings).await
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_data_members() {
        let page = serde_json::json!({
            "nextPageCursor": null,
            "data": [
                { "userId": 1, "username": "a" },
                { "userId": 2, "username": "b" }
            ]
        });
        let members = map_data(&page, member_from).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].username, "b");
    }

    #[test]
    fn test_map_data_empty_page() {
        let page = serde_json::json!({ "nextPageCursor": null, "data": [] });
        assert!(map_data(&page, member_from).unwrap().is_empty());
    }

    #[test]
    fn test_map_data_without_data_fails() {
        let page = serde_json::json!({ "errors": [{ "code": 0, "message": "oops" }] });
        let err = map_data(&page, member_from).unwrap_err();
        assert!(matches!(err, Error::MissingField("data")));

        let not_array = serde_json::json!({ "data": { "userId": 1 } });
        assert!(matches!(
            map_data(&not_array, member_from),
            Err(Error::MissingField("data"))
        ));
    }

    #[test]
    fn test_requester_needs_user() {
        let err = requester_from(&serde_json::json!({ "created": "now" })).unwrap_err();
        assert!(matches!(err, Error::MissingField("user")));

        let user = requester_from(&serde_json::json!({
            "user": { "userId": 9, "username": "joiner" }
        }))
        .unwrap();
        assert_eq!(user.username, "joiner");
    }
}
