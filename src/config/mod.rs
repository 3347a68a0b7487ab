//! Configuration management for jiradmin.
//!
//! This module handles loading and saving the user configuration: JIRA
//! profiles and application settings, stored as TOML.

mod profile;
mod settings;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use profile::Profile;
pub use settings::Settings;

/// Errors that can occur while handling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(std::io::Error),

    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(std::io::Error),

    /// The configuration file could not be written.
    #[error("Failed to write configuration file: {0}")]
    WriteError(std::io::Error),

    /// The configuration file is not valid TOML for [`Config`].
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// The configuration is well-formed but invalid.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No profile with the requested name exists.
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
    /// Configured JIRA instances.
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// Default location: `{config_dir}/jiradmin/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("jiradmin").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load and validate the configuration at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration");

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        debug!("Loaded {} profiles", config.profiles.len());
        Ok(config)
    }

    /// Validate and write the configuration to `path`, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::WriteError)?;

        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate every profile and reject duplicate names and dangling
    /// default profiles.
    pub fn validate(&self) -> Result<()> {
        if self.settings.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "settings.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(name) = &self.settings.default_profile {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' is not defined",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// The profile to use when none is named: the configured default, or the
    /// only profile if there is exactly one.
    pub fn default_profile(&self) -> Result<&Profile> {
        match (&self.settings.default_profile, self.profiles.as_slice()) {
            (Some(name), _) => self.profile(name),
            (None, [only]) => Ok(only),
            (None, []) => Err(ConfigError::ValidationError(
                "no profiles configured".to_string(),
            )),
            (None, _) => Err(ConfigError::ValidationError(
                "several profiles configured: set settings.default_profile or pass --profile"
                    .to_string(),
            )),
        }
    }
}
