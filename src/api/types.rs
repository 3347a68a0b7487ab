//! JIRA API request and response types.
//!
//! These types model the JIRA REST API v2 responses for projects, roles,
//! users and groups, plus the Atom activity stream.
//!
//! Fields the server may omit default to empty values, mirroring how the
//! API leaves out blank attributes. Expansion-only fields are `Option`s so
//! that "not requested" and "requested but empty" stay distinguishable.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A JIRA project.
///
/// Returned as a list by `GET /rest/api/2/project/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The project ID.
    #[serde(default)]
    pub id: String,
    /// The project key (e.g., "PROJ").
    #[serde(default)]
    pub key: String,
    /// The project display name.
    #[serde(default)]
    pub name: String,
    /// REST URL of the project.
    #[serde(rename = "self", default)]
    pub self_url: String,
    /// The project type, e.g. "software".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type_key: Option<String>,
    /// Avatar URLs keyed by size ("48x48", ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub avatar_urls: BTreeMap<String, String>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.name)
    }
}

/// One role category attached to a project, with its members.
///
/// Returned by the URLs listed in `GET /rest/api/2/project/{key}/role`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoles {
    /// The role name (e.g., "Developers").
    #[serde(default)]
    pub name: String,
    /// The actors holding this role.
    #[serde(default)]
    pub actors: Vec<Role>,
}

/// A single role actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Actor type tag, e.g. "atlassian-user-role-actor".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Actor name (user or group name).
    #[serde(default)]
    pub name: String,
}

/// A JIRA user.
///
/// Returned by `GET /rest/api/2/user?username=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// REST URL of the user. Empty when the server did not find the user.
    #[serde(rename = "self", default)]
    pub self_url: String,
    /// The username.
    #[serde(default)]
    pub name: String,
    /// The user's email address (may be empty if hidden).
    #[serde(default)]
    pub email_address: String,
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
    /// Whether the user is active.
    #[serde(default)]
    pub active: bool,
    /// The user's timezone.
    #[serde(default)]
    pub time_zone: String,
    /// Avatar URLs keyed by size ("48x48", ...).
    #[serde(default)]
    pub avatar_urls: BTreeMap<String, String>,
    /// Expansions the server offers for this resource.
    #[serde(default)]
    pub expand: String,
    /// Groups the user belongs to; only present with `expand=groups`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Groups>,
    /// Error messages the server embedded in the body.
    #[serde(rename = "errorMessages", default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl User {
    /// Whether the payload identified an actual user.
    pub fn is_found(&self) -> bool {
        !self.self_url.is_empty()
    }

    /// Names of the embedded groups, if groups were expanded.
    pub fn group_names(&self) -> Option<Vec<&str>> {
        self.groups
            .as_ref()
            .map(|groups| groups.items.iter().map(|g| g.name.as_str()).collect())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.name)
    }
}

/// Expanded group membership of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groups {
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub items: Vec<Group>,
}

/// A JIRA group.
///
/// Returned by `GET /rest/api/2/group?groupname=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// The group name.
    #[serde(default)]
    pub name: String,
    /// REST URL of the group.
    #[serde(rename = "self", default)]
    pub self_url: String,
    /// Group members; only present with `expand=users`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Users>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Expanded member list of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Users {
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub items: Vec<User>,
}

/// Role index of a project: role name to the URL of its detail resource.
///
/// Returned by `GET /rest/api/2/project/{key}/role`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleIndex(pub BTreeMap<String, String>);

impl RoleIndex {
    /// Iterate over `(role name, url)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a user search.
///
/// The server answers `GET /user?username=` with a single object, while the
/// search endpoints answer with an array; both decode into a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct UserList(pub Vec<User>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<User>),
    One(Box<User>),
}

impl From<OneOrMany> for UserList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(users) => UserList(users),
            OneOrMany::One(user) => UserList(vec![*user]),
        }
    }
}

/// Body of `POST /rest/api/2/user`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email_address: &'a str,
    pub display_name: &'a str,
}

/// Body of `POST /rest/api/2/group/user`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMember<'a> {
    pub name: &'a str,
}

/// An Atom activity stream.
///
/// Returned by the activity-stream plugin as XML in the
/// `http://www.w3.org/2005/Atom` namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFeed {
    pub title: String,
    pub id: String,
    pub links: Vec<Link>,
    /// When the feed was last updated, if the server said so.
    pub updated: Option<DateTime<FixedOffset>>,
    pub author: Person,
    /// Entries in feed order.
    pub entries: Vec<ActivityItem>,
}

/// One entry of an activity stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub title: String,
    pub id: String,
    pub links: Vec<Link>,
    pub updated: DateTime<FixedOffset>,
    pub author: Person,
    pub summary: Text,
    pub category: Category,
}

/// An Atom `<link>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    pub href: String,
}

/// An Atom person construct (`<author>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub uri: String,
    pub email: String,
}

/// An Atom text construct (`<summary>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// The `type` attribute ("text", "html", ...), if given.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub body: String,
}

/// An Atom `<category>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub term: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_list() {
        let json = r#"[
            {"self": "http://jira/rest/api/2/project/10000", "id": "10000", "key": "EX", "name": "Example", "projectTypeKey": "software"},
            {"self": "http://jira/rest/api/2/project/10001", "id": "10001", "key": "ABC", "name": "Alphabetical"}
        ]"#;
        let projects: Vec<Project> = serde_json::from_str(json).unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].key, "EX");
        assert_eq!(projects[0].self_url, "http://jira/rest/api/2/project/10000");
        assert_eq!(projects[0].project_type_key.as_deref(), Some("software"));
        assert!(projects[1].project_type_key.is_none());
    }

    #[test]
    fn test_project_roles_round_trip() {
        let roles = ProjectRoles {
            name: "Developers".to_string(),
            actors: vec![
                Role {
                    kind: "atlassian-user-role-actor".to_string(),
                    name: "jira-developers".to_string(),
                },
                Role {
                    kind: "atlassian-group-role-actor".to_string(),
                    name: "devs".to_string(),
                },
            ],
        };

        let json = serde_json::to_string(&roles).unwrap();
        assert!(json.contains("\"type\":\"atlassian-user-role-actor\""));

        let parsed: ProjectRoles = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roles);
    }

    #[test]
    fn test_parse_user_without_expansion() {
        let json = r#"{
            "self": "http://jira/rest/api/2/user?username=fred",
            "name": "fred",
            "emailAddress": "fred@example.com",
            "avatarUrls": {"16x16": "http://jira/avatar/16", "48x48": "http://jira/avatar/48"},
            "displayName": "Fred F. User",
            "active": true,
            "timeZone": "Australia/Sydney"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert!(user.is_found());
        assert_eq!(user.name, "fred");
        assert_eq!(user.email_address, "fred@example.com");
        assert_eq!(user.time_zone, "Australia/Sydney");
        assert_eq!(user.avatar_urls.len(), 2);
        assert!(user.groups.is_none());
        assert!(user.group_names().is_none());
    }

    #[test]
    fn test_parse_user_with_empty_groups_expansion() {
        let json = r#"{"self": "http://jira/user", "name": "fred", "groups": {"size": 0, "items": []}}"#;
        let user: User = serde_json::from_str(json).unwrap();

        let groups = user.groups.as_ref().unwrap();
        assert_eq!(groups.size, 0);
        assert_eq!(user.group_names(), Some(vec![]));
    }

    #[test]
    fn test_parse_user_error_body() {
        let json = r#"{"errorMessages": ["The user named 'ghost' does not exist"], "errors": {}}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert!(!user.is_found());
        assert_eq!(user.errors.len(), 1);
    }

    #[test]
    fn test_parse_group_with_users() {
        let json = r#"{
            "name": "jira-administrators",
            "self": "http://jira/rest/api/2/group?groupname=jira-administrators",
            "users": {
                "size": 1,
                "items": [{"self": "http://jira/user?username=admin", "name": "admin", "displayName": "Admin", "active": true}]
            },
            "expand": "users"
        }"#;
        let group: Group = serde_json::from_str(json).unwrap();

        let users = group.users.unwrap();
        assert_eq!(users.size, 1);
        assert_eq!(users.items[0].name, "admin");
    }

    #[test]
    fn test_parse_role_index() {
        let json = r#"{
            "Administrators": "http://jira/rest/api/2/project/EX/role/10002",
            "Developers": "http://jira/rest/api/2/project/EX/role/10001"
        }"#;
        let index: RoleIndex = serde_json::from_str(json).unwrap();

        assert_eq!(index.len(), 2);
        let names: Vec<&str> = index.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Administrators", "Developers"]);
    }

    #[test]
    fn test_user_list_accepts_single_object() {
        let list: UserList = serde_json::from_str(r#"{"self": "http://jira/user", "name": "fred"}"#).unwrap();
        assert_eq!(list.0.len(), 1);
        assert_eq!(list.0[0].name, "fred");
    }

    #[test]
    fn test_user_list_accepts_array() {
        let list: UserList =
            serde_json::from_str(r#"[{"name": "fred"}, {"name": "barney"}]"#).unwrap();
        let names: Vec<&str> = list.0.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["fred", "barney"]);
    }

    #[test]
    fn test_request_bodies_are_escaped() {
        let member = GroupMember { name: "o\"brien" };
        assert_eq!(serde_json::to_string(&member).unwrap(), r#"{"name":"o\"brien"}"#);

        let user = NewUser {
            name: "u",
            email_address: "e",
            display_name: "f",
        };
        assert_eq!(
            serde_json::to_string(&user).unwrap(),
            r#"{"name":"u","emailAddress":"e","displayName":"f"}"#
        );
    }

    #[test]
    fn test_user_display() {
        let user = User {
            name: "fred".to_string(),
            display_name: "Fred F. User".to_string(),
            ..Default::default()
        };
        assert_eq!(user.to_string(), "Fred F. User (fred)");
    }
}
