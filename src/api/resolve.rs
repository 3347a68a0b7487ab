//! Fan-out resolution of indirect references.
//!
//! Some resources are served as an index of `name -> url` rather than
//! inline. Resolving one means fetching every URL and collecting what
//! decodes.

use tracing::{debug, warn};

use super::decode::Resource;
use super::error::Partial;
use super::fetch::fetch_resource;
use super::transport::Transport;

/// Fetch and decode every referenced URL, one after another.
///
/// Entries that fail to fetch or decode are skipped, and the failure is
/// kept as the trailing error; a later failure replaces an earlier one.
/// Successful entries are returned in resolution order.
pub async fn resolve_references<'a, T, R, I>(transport: &T, references: I) -> Partial<R>
where
    T: Transport,
    R: Resource,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut resolved = Partial {
        items: Vec::new(),
        last_error: None,
    };

    for (name, url) in references {
        match fetch_resource::<T, R>(transport, url).await {
            Ok(item) => {
                debug!(reference = name, "Resolved reference");
                resolved.items.push(item);
            }
            Err(e) => {
                warn!(reference = name, url = url, error = %e, "Skipping unresolved reference");
                resolved.last_error = Some(e);
            }
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::testing::FakeTransport;
    use crate::api::types::ProjectRoles;

    const DEVELOPERS: &str = r#"{"name": "Developers", "actors": [{"type": "atlassian-user-role-actor", "name": "fred"}]}"#;
    const ADMINS: &str = r#"{"name": "Administrators", "actors": []}"#;

    #[test]
    fn test_resolves_all_references_in_order() {
        let transport = FakeTransport::new()
            .with_body("http://jira/role/1", DEVELOPERS)
            .with_body("http://jira/role/2", ADMINS);

        let refs = [("Developers", "http://jira/role/1"), ("Administrators", "http://jira/role/2")];
        let resolved: Partial<ProjectRoles> =
            tokio_test::block_on(resolve_references(&transport, refs));

        assert!(resolved.is_complete());
        let names: Vec<&str> = resolved.items.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Developers", "Administrators"]);
    }

    #[test]
    fn test_skips_failed_decode_and_keeps_going() {
        let transport = FakeTransport::new()
            .with_body("http://jira/role/1", "{not json")
            .with_body("http://jira/role/2", DEVELOPERS);

        let refs = [("admins", "http://jira/role/1"), ("developers", "http://jira/role/2")];
        let resolved: Partial<ProjectRoles> =
            tokio_test::block_on(resolve_references(&transport, refs));

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.items[0].name, "Developers");
        assert!(resolved.last_error.unwrap().is_decode());
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_keeps_last_error() {
        let transport = FakeTransport::new()
            .with_body("http://jira/role/1", "")
            .with_body("http://jira/role/2", DEVELOPERS)
            .with_status("http://jira/role/3", 403);

        let refs = [
            ("a", "http://jira/role/1"),
            ("b", "http://jira/role/2"),
            ("c", "http://jira/role/3"),
        ];
        let resolved: Partial<ProjectRoles> =
            tokio_test::block_on(resolve_references(&transport, refs));

        assert_eq!(resolved.len(), 1);
        assert!(matches!(resolved.last_error, Some(ApiError::Forbidden)));
    }

    #[test]
    fn test_all_failed_returns_empty_with_error() {
        let transport = FakeTransport::new().with_body("http://jira/role/1", "42");

        let resolved: Partial<ProjectRoles> = tokio_test::block_on(resolve_references(
            &transport,
            [("a", "http://jira/role/1")],
        ));

        assert!(resolved.is_empty());
        assert!(resolved.last_error.is_some());
    }

    #[test]
    fn test_no_references() {
        let transport = FakeTransport::new();

        let resolved: Partial<ProjectRoles> =
            tokio_test::block_on(resolve_references(&transport, Vec::<(&str, &str)>::new()));

        assert!(resolved.is_empty());
        assert!(resolved.is_complete());
        assert!(transport.requests().is_empty());
    }
}
