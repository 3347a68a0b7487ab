//! Request URL construction.

use std::borrow::Cow;

use tracing::warn;

/// Default REST API prefix.
pub const DEFAULT_API_PATH: &str = "/rest/api/2";

/// Default activity-stream path.
pub const DEFAULT_ACTIVITY_PATH: &str = "/activity";

/// Immutable addressing information for one JIRA instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    api_path: String,
    activity_path: String,
}

impl ApiConfig {
    /// Create a configuration with the default API and activity paths.
    pub fn new(base_url: &str) -> Self {
        Self::with_paths(base_url, DEFAULT_API_PATH, DEFAULT_ACTIVITY_PATH)
    }

    /// Create a configuration with explicit paths.
    pub fn with_paths(base_url: &str, api_path: &str, activity_path: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_path: api_path.trim_end_matches('/').to_string(),
            activity_path: activity_path.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    pub fn activity_path(&self) -> &str {
        &self.activity_path
    }

    /// URL of a REST resource: `{base}{api_path}{resource}?{query}`.
    pub fn resource_url(&self, resource: &str, query: &[(&str, &str)]) -> String {
        build_url(&[&self.base_url, &self.api_path, resource], query)
    }

    /// URL of the activity stream: `{base}{activity_path}?{query}`.
    pub fn activity_url(&self, query: &[(&str, &str)]) -> String {
        build_url(&[&self.base_url, &self.activity_path], query)
    }
}

/// Concatenate `segments` and append the percent-encoded query string.
///
/// No validation is done; a malformed result surfaces as a transport error.
pub fn build_url(segments: &[&str], query: &[(&str, &str)]) -> String {
    let mut url = segments.concat();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query_string(query));
    }
    url
}

/// Encode `key=value` pairs joined by `&`.
pub fn query_string(query: &[(&str, &str)]) -> String {
    query
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}. Credentials will be sent in clear text.", url);
    }

    url.to_string()
}
