//! Response decoding.
//!
//! Every payload the client receives is decoded through [`decode`], which
//! picks the wire format from the target's [`ResourceKind`]: JSON for the
//! REST resources, Atom XML for the activity stream.

use std::fmt;

use serde::de::DeserializeOwned;

use super::atom;
use super::error::{ApiError, Result};
use super::types::{ActivityFeed, Group, Project, ProjectRoles, RoleIndex, User, UserList};

/// Which entity schema a payload decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ProjectList,
    RoleIndex,
    ProjectRoles,
    User,
    UserList,
    Group,
    ActivityFeed,
}

/// Wire format of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Media type to ask for in the `Accept` header.
    pub fn media_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/atom+xml",
        }
    }
}

impl ResourceKind {
    /// The wire format the server uses for this kind.
    pub fn format(self) -> Format {
        match self {
            ResourceKind::ActivityFeed => Format::Xml,
            _ => Format::Json,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::ProjectList => "project list",
            ResourceKind::RoleIndex => "role index",
            ResourceKind::ProjectRoles => "project roles",
            ResourceKind::User => "user",
            ResourceKind::UserList => "user list",
            ResourceKind::Group => "group",
            ResourceKind::ActivityFeed => "activity feed",
        };
        f.write_str(name)
    }
}

/// A type the client can decode from a response body.
pub trait Resource: DeserializeOwned {
    /// The kind tag that selects the decoder.
    const KIND: ResourceKind;

    /// Decode from an XML document. Only XML kinds override this.
    fn from_xml(_xml: &str) -> Result<Self> {
        Err(ApiError::decode(Self::KIND, "resource has no XML representation"))
    }
}

impl Resource for Vec<Project> {
    const KIND: ResourceKind = ResourceKind::ProjectList;
}

impl Resource for RoleIndex {
    const KIND: ResourceKind = ResourceKind::RoleIndex;
}

impl Resource for ProjectRoles {
    const KIND: ResourceKind = ResourceKind::ProjectRoles;
}

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;
}

impl Resource for UserList {
    const KIND: ResourceKind = ResourceKind::UserList;
}

impl Resource for Group {
    const KIND: ResourceKind = ResourceKind::Group;
}

impl Resource for ActivityFeed {
    const KIND: ResourceKind = ResourceKind::ActivityFeed;

    fn from_xml(xml: &str) -> Result<Self> {
        atom::parse_feed(xml)
    }
}

/// Decode a raw response body into `T`.
///
/// Empty or malformed bodies are reported as [`ApiError::Decode`]; whether
/// that aborts the operation is the caller's decision.
pub fn decode<T: Resource>(bytes: &[u8]) -> Result<T> {
    match T::KIND.format() {
        Format::Json => {
            serde_json::from_slice(bytes).map_err(|e| ApiError::decode(T::KIND, e.to_string()))
        }
        Format::Xml => {
            let xml = std::str::from_utf8(bytes)
                .map_err(|e| ApiError::decode(T::KIND, format!("body is not UTF-8: {}", e)))?;
            T::from_xml(xml)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activity_feed_is_xml() {
        assert_eq!(ResourceKind::ActivityFeed.format(), Format::Xml);
        for kind in [
            ResourceKind::ProjectList,
            ResourceKind::RoleIndex,
            ResourceKind::ProjectRoles,
            ResourceKind::User,
            ResourceKind::UserList,
            ResourceKind::Group,
        ] {
            assert_eq!(kind.format(), Format::Json, "{} should be JSON", kind);
        }
    }

    #[test]
    fn test_decode_json_resource() {
        let roles: ProjectRoles = decode(
            br#"{"name": "Developers", "actors": [{"type": "atlassian-user-role-actor", "name": "fred"}]}"#,
        )
        .unwrap();
        assert_eq!(roles.name, "Developers");
        assert_eq!(roles.actors[0].name, "fred");
    }

    #[test]
    fn test_decode_empty_body_is_decode_error() {
        let err = decode::<User>(b"").unwrap_err();
        match err {
            ApiError::Decode { kind, .. } => assert_eq!(kind, ResourceKind::User),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_json_reports_kind() {
        let err = decode::<Vec<Project>>(b"<html>oops</html>").unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode project list"));
    }

    #[test]
    fn test_decode_dispatches_activity_feed_to_xml() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><title>Activity</title></feed>"#;
        let feed: ActivityFeed = decode(xml).unwrap();
        assert_eq!(feed.title, "Activity");
        assert!(feed.entries.is_empty());
    }

    #[test]
    fn test_decode_activity_feed_rejects_json() {
        let err = decode::<ActivityFeed>(br#"{"title": "Activity"}"#).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode {
                kind: ResourceKind::ActivityFeed,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_non_utf8_xml() {
        let err = decode::<ActivityFeed>(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.is_decode());
    }
}
