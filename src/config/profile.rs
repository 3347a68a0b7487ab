//! JIRA profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::{ApiConfig, DEFAULT_ACTIVITY_PATH, DEFAULT_API_PATH};

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

fn default_activity_path() -> String {
    DEFAULT_ACTIVITY_PATH.to_string()
}

/// A JIRA profile configuration.
///
/// Profiles store connection details for a JIRA instance.
/// API tokens are stored separately in the OS keychain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// The JIRA instance URL (e.g., "https://jira.example.com").
    pub url: String,

    /// The login used for Basic authentication: a username on Server and
    /// Data Center, an email address on Cloud.
    #[serde(alias = "email")]
    pub login: String,

    /// REST API prefix appended to the URL.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Activity-stream path appended to the URL.
    #[serde(default = "default_activity_path")]
    pub activity_path: String,
}

impl Profile {
    /// Create a new profile with the default API and activity paths.
    pub fn new(name: String, url: String, login: String) -> Self {
        Self {
            name,
            url,
            login,
            api_path: default_api_path(),
            activity_path: default_activity_path(),
        }
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - The URL is non-empty and uses http or https
    /// - The login is non-empty
    /// - Both paths start with '/'
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL cannot be empty",
                self.name
            )));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        if self.login.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': login cannot be empty",
                self.name
            )));
        }

        for (field, path) in [("api_path", &self.api_path), ("activity_path", &self.activity_path)] {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "profile '{}': {} must start with '/'",
                    self.name, field
                )));
            }
        }

        Ok(())
    }

    /// Addressing for the client.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::with_paths(&self.url, &self.api_path, &self.activity_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new(
            "work".to_string(),
            "https://jira.example.com".to_string(),
            "user@example.com".to_string(),
        )
    }

    #[test]
    fn test_profile_creation() {
        let profile = profile();

        assert_eq!(profile.name, "work");
        assert_eq!(profile.api_path, "/rest/api/2");
        assert_eq!(profile.activity_path, "/activity");
    }

    #[test]
    fn test_valid_profile() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let profile = Profile {
            name: String::new(),
            ..profile()
        };

        let result = profile.validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("name cannot be empty"));
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let profile = Profile {
            name: "my work".to_string(),
            ..profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("cannot contain whitespace"));
    }

    #[test]
    fn test_invalid_url_scheme_rejected() {
        let profile = Profile {
            url: "jira.example.com".to_string(),
            ..profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_username_login_accepted() {
        let profile = Profile::new(
            "srv".to_string(),
            "https://jira.example.com".to_string(),
            "admin".to_string(),
        );

        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_empty_login_rejected() {
        let profile = Profile {
            login: " ".to_string(),
            ..profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("login cannot be empty"));
    }

    #[test]
    fn test_relative_api_path_rejected() {
        let profile = Profile {
            api_path: "rest/api/2".to_string(),
            ..profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("api_path must start with '/'"));
    }

    #[test]
    fn test_api_config() {
        let profile = Profile {
            url: "https://jira.example.com/jira/".to_string(),
            api_path: "/rest/api/latest".to_string(),
            ..profile()
        };

        let config = profile.api_config();
        assert_eq!(
            config.resource_url("/project/", &[]),
            "https://jira.example.com/jira/rest/api/latest/project/"
        );
        assert_eq!(
            config.activity_url(&[]),
            "https://jira.example.com/jira/activity"
        );
    }

    #[test]
    fn test_paths_default_when_missing() {
        let toml_str = r#"
            name = "work"
            url = "https://jira.example.com"
            email = "user@example.com"
        "#;
        let parsed: Profile = toml::from_str(toml_str).unwrap();

        assert_eq!(parsed, profile());
    }

    #[test]
    fn test_login_key_parses() {
        let toml_str = r#"
            name = "srv"
            url = "https://jira.example.com"
            login = "admin"
        "#;
        let parsed: Profile = toml::from_str(toml_str).unwrap();

        assert_eq!(parsed.login, "admin");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_profile_serialization() {
        let profile = profile();

        let toml_str = toml::to_string(&profile).unwrap();
        let parsed: Profile = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, profile);
    }
}
