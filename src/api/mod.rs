//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST
//! API and the activity-stream feed.

mod atom;
pub mod auth;
mod client;
pub mod decode;
pub mod error;
mod fetch;
mod resolve;
mod search;
mod transport;
pub mod types;
mod url;

#[cfg(test)]
mod testing;

pub use auth::Auth;
pub use client::JiraClient;
pub use decode::{decode, Format, Resource, ResourceKind};
pub use error::{ApiError, Partial, Result};
pub use fetch::{fetch, fetch_resource};
pub use resolve::resolve_references;
pub use search::filter_by_text;
pub use transport::{HttpMethod, HttpTransport, Request, Transport, DEFAULT_TIMEOUT_SECS};
pub use types::{
    ActivityFeed, ActivityItem, Category, Group, Groups, Link, Person, Project, ProjectRoles,
    Role, RoleIndex, Text, User, UserList, Users,
};
pub use url::{build_url, query_string, ApiConfig, DEFAULT_ACTIVITY_PATH, DEFAULT_API_PATH};
