//! JIRA API client implementation.
//!
//! Every operation follows the same pipeline: build the URL from the
//! [`ApiConfig`], fetch through the [`Transport`], decode by resource kind.
//! Requests are issued one at a time, and nothing is cached or retried.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::decode::{decode, Resource};
use super::error::{ApiError, Partial, Result};
use super::fetch::{fetch, fetch_resource};
use super::resolve::resolve_references;
use super::search::filter_by_text;
use super::transport::{HttpMethod, HttpTransport, Request, Transport};
use super::types::{
    ActivityFeed, Group, GroupMember, NewUser, Project, ProjectRoles, RoleIndex, User, UserList,
};
use super::url::ApiConfig;
use crate::config::{Profile, Settings};

const PROJECT_PATH: &str = "/project/";
const USER_PATH: &str = "/user";
const GROUP_PATH: &str = "/group";
const GROUP_USER_PATH: &str = "/group/user";

/// The JIRA API client.
///
/// Generic over the transport so the pipeline can run against an
/// in-memory server in tests.
#[derive(Debug)]
pub struct JiraClient<T = HttpTransport> {
    /// Addressing for the JIRA instance.
    config: ApiConfig,
    /// Executes the requests.
    transport: T,
}

impl JiraClient<HttpTransport> {
    /// Create a client from a configured profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no API token is available for the profile or the
    /// HTTP client cannot be built.
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub fn from_profile(profile: &Profile, settings: &Settings) -> Result<Self> {
        info!("Creating JIRA client for profile");

        let auth = Auth::resolve(&profile.name, &profile.login)?;
        let transport = HttpTransport::with_timeout(
            auth,
            Duration::from_secs(settings.request_timeout_secs),
        )?;

        Ok(Self::new(profile.api_config(), transport))
    }

    /// Create a client with explicit credentials and default paths.
    pub fn with_credentials(base_url: &str, login: &str, token: &str) -> Result<Self> {
        let transport = HttpTransport::new(Auth::new(login, token))?;
        Ok(Self::new(ApiConfig::new(base_url), transport))
    }
}

impl<T: Transport> JiraClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The addressing this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Execute a raw request and return the response body.
    pub async fn fetch(&self, method: HttpMethod, url: &str, body: Option<String>) -> Result<Vec<u8>> {
        fetch(&self.transport, &Request::new(method, url, body)).await
    }

    async fn get<R: Resource>(&self, url: &str) -> Result<R> {
        fetch_resource(&self.transport, url).await
    }

    async fn send_json<B: serde::Serialize>(&self, method: HttpMethod, url: &str, body: &B) -> Result<()> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialize(e.to_string()))?;
        self.fetch(method, url, Some(body)).await?;
        Ok(())
    }

    /// List the projects visible to the user whose name contains `search`,
    /// ignoring case. An empty search returns every project.
    ///
    /// Calls `GET /rest/api/2/project/` and filters locally.
    #[instrument(skip(self))]
    pub async fn search_projects(&self, search: &str) -> Result<Vec<Project>> {
        let url = self.config.resource_url(PROJECT_PATH, &[]);
        let projects: Vec<Project> = self.get(&url).await?;
        let total = projects.len();

        let matches = filter_by_text(projects, search, |p| p.name.as_str());
        debug!("Matched {} of {} projects", matches.len(), total);
        Ok(matches)
    }

    /// Get every role of a project, with members.
    ///
    /// Fetches the role index (`GET /rest/api/2/project/{key}/role`) and then
    /// each role it lists. This is best effort: roles that fail are left out
    /// and the last failure is returned in [`Partial::last_error`] next to
    /// the roles that resolved. Role order follows the index and carries no
    /// meaning.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when the index request itself fails at the
    /// transport level. An undecodable index yields no roles and a trailing
    /// decode error.
    #[instrument(skip(self), fields(project_key = %key))]
    pub async fn project_roles(&self, key: &str) -> Result<Partial<ProjectRoles>> {
        let url = self
            .config
            .resource_url(&format!("{}{}/role", PROJECT_PATH, key), &[]);
        let body = fetch(&self.transport, &Request::get(url)).await?;

        let index: RoleIndex = match decode(&body) {
            Ok(index) => index,
            Err(e) => {
                warn!("Role index could not be decoded: {}", e);
                return Ok(Partial {
                    items: Vec::new(),
                    last_error: Some(e),
                });
            }
        };
        debug!("Resolving {} roles", index.len());

        let roles: Partial<ProjectRoles> =
            resolve_references(&self.transport, index.iter()).await;
        if let Some(e) = &roles.last_error {
            warn!("Resolved {} of {} roles, last failure: {}", roles.len(), index.len(), e);
        }
        Ok(roles)
    }

    /// Get a user.
    ///
    /// Calls `GET /rest/api/2/user?username={username}`.
    #[instrument(skip(self))]
    pub async fn user(&self, username: &str) -> Result<User> {
        let url = self
            .config
            .resource_url(USER_PATH, &[("username", username)]);
        self.get(&url).await
    }

    /// Get a user together with the groups they belong to.
    ///
    /// Calls `GET /rest/api/2/user?username={username}&expand=groups`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the body decodes but does not
    /// identify a user (empty `self`).
    #[instrument(skip(self))]
    pub async fn user_with_groups(&self, username: &str) -> Result<User> {
        let url = self
            .config
            .resource_url(USER_PATH, &[("username", username), ("expand", "groups")]);
        let user: User = self.get(&url).await?;

        if !user.is_found() {
            let reason = if user.errors.is_empty() {
                format!("user '{}'", username)
            } else {
                user.errors.join(", ")
            };
            return Err(ApiError::NotFound(reason));
        }

        Ok(user)
    }

    /// Look up users by username.
    ///
    /// Calls `GET /rest/api/2/user?username={username}`. Entries that do not
    /// identify a user are dropped, so an unknown name yields an empty list.
    #[instrument(skip(self))]
    pub async fn search_users(&self, username: &str) -> Result<Vec<User>> {
        let url = self
            .config
            .resource_url(USER_PATH, &[("username", username)]);
        let UserList(users) = self.get(&url).await?;

        Ok(users.into_iter().filter(User::is_found).collect())
    }

    /// Get a group with its members.
    ///
    /// Calls `GET /rest/api/2/group?groupname={groupname}&expand=users`.
    #[instrument(skip(self))]
    pub async fn users_in_group(&self, groupname: &str) -> Result<Group> {
        let url = self
            .config
            .resource_url(GROUP_PATH, &[("groupname", groupname), ("expand", "users")]);
        let group: Group = self.get(&url).await?;

        debug!(
            "Group has {} members",
            group.users.as_ref().map_or(0, |u| u.items.len())
        );
        Ok(group)
    }

    /// Add a user to a group.
    ///
    /// Calls `POST /rest/api/2/group/user?groupname={groupname}` with
    /// `{"name": username}`.
    #[instrument(skip(self))]
    pub async fn add_user_to_group(&self, groupname: &str, username: &str) -> Result<()> {
        let url = self
            .config
            .resource_url(GROUP_USER_PATH, &[("groupname", groupname)]);
        self.send_json(HttpMethod::Post, &url, &GroupMember { name: username })
            .await?;

        info!("Added user to group");
        Ok(())
    }

    /// Create a user.
    ///
    /// Calls `POST /rest/api/2/user`.
    #[instrument(skip(self))]
    pub async fn add_user(&self, username: &str, display_name: &str, email: &str) -> Result<()> {
        let url = self.config.resource_url(USER_PATH, &[]);
        let body = NewUser {
            name: username,
            email_address: email,
            display_name,
        };
        self.send_json(HttpMethod::Post, &url, &body).await?;

        info!("Created user");
        Ok(())
    }

    /// Remove a user from a group.
    ///
    /// Calls `DELETE /rest/api/2/group/user?groupname={groupname}&username={username}`.
    #[instrument(skip(self))]
    pub async fn remove_user_from_group(&self, groupname: &str, username: &str) -> Result<()> {
        let url = self.config.resource_url(
            GROUP_USER_PATH,
            &[("groupname", groupname), ("username", username)],
        );
        self.fetch(HttpMethod::Delete, &url, None).await?;

        info!("Removed user from group");
        Ok(())
    }

    /// Get the activity stream of one user.
    ///
    /// Calls `GET {activity_path}?streams=user IS {user}`.
    #[instrument(skip(self))]
    pub async fn user_activity(&self, user: &str) -> Result<ActivityFeed> {
        let filter = format!("user IS {}", user);
        let url = self.config.activity_url(&[("streams", &filter)]);
        self.activity(&url).await
    }

    /// Get an activity stream from an explicit URL.
    #[instrument(skip(self))]
    pub async fn activity(&self, url: &str) -> Result<ActivityFeed> {
        let feed: ActivityFeed = self.get(url).await?;
        debug!("Activity feed has {} entries", feed.entries.len());
        Ok(feed)
    }
}
