//! Authentication handling for the JIRA API.
//!
//! Requests use Basic Auth (username or email + API token or password).
//! Tokens come from the `JIRADMIN_API_TOKEN` environment variable or the OS
//! keyring.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use super::error::{ApiError, Result};

/// The keyring service name for jiradmin tokens.
const KEYRING_SERVICE: &str = "jiradmin";

/// Environment variable that overrides the keyring.
pub const TOKEN_ENV_VAR: &str = "JIRADMIN_API_TOKEN";

/// Authentication credentials for JIRA.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The login (username or email address).
    login: String,
    /// The Base64-encoded authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from a login and token.
    ///
    /// The token is immediately encoded and the raw token is not stored.
    pub fn new(login: &str, token: &str) -> Self {
        let auth_header = build_auth_header(login, token);
        Self {
            login: login.to_string(),
            auth_header,
        }
    }

    /// Resolve credentials for a profile.
    ///
    /// Reads the token from `JIRADMIN_API_TOKEN` if set, otherwise from the
    /// OS keyring entry for the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source has a token.
    pub fn resolve(profile_name: &str, login: &str) -> Result<Self> {
        let token = match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => {
                debug!("Using API token from {}", TOKEN_ENV_VAR);
                token
            }
            _ => get_token(profile_name)?,
        };
        Ok(Self::new(login, &token))
    }

    /// Get the authorization header value for HTTP requests.
    ///
    /// Returns the complete "Basic ..." header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the login.
    pub fn login(&self) -> &str {
        &self.login
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "login:token" in Base64 and prepends "Basic ".
fn build_auth_header(login: &str, token: &str) -> String {
    let credentials = format!("{}:{}", login, token);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

/// Store an API token in the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))?;

    Ok(())
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be retrieved from the keyring.
pub fn get_token(profile_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be deleted from the keyring.
pub fn delete_token(profile_name: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))?;

    Ok(())
}
