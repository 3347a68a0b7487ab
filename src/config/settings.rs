//! Application settings configuration.

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_TIMEOUT_SECS;

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The name of the default profile to use.
    pub default_profile: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
