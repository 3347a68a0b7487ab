//! API error types for the JIRA client.

use thiserror::Error;

use super::decode::ResourceKind;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - invalid email or API token.
    #[error("Authentication failed: check your email and API token")]
    Unauthorized,

    /// Permission denied - user lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the JIRA API.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// JIRA server error.
    #[error("JIRA server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// The payload did not match the schema of the expected resource.
    #[error("Failed to decode {kind}: {message}")]
    Decode { kind: ResourceKind, message: String },

    /// A request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// Create a decode error for the given resource kind.
    pub fn decode(kind: ResourceKind, message: impl Into<String>) -> Self {
        ApiError::Decode {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error was raised by the decoder rather than the transport.
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }
}

/// Outcome of a best-effort aggregation.
///
/// `items` holds every entry that was fetched and decoded successfully, in
/// resolution order. `last_error` holds the most recent failure seen while
/// aggregating, if any. Both can be populated at once: that is a partial
/// success and callers should still use the items.
#[derive(Debug, Default)]
pub struct Partial<T> {
    /// Successfully resolved entries.
    pub items: Vec<T>,
    /// The last failure encountered, if any.
    pub last_error: Option<ApiError>,
}

impl<T> Partial<T> {
    /// Whether every entry resolved.
    pub fn is_complete(&self) -> bool {
        self.last_error.is_none()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing resolved.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Split into the resolved items and the trailing error.
    pub fn into_parts(self) -> (Vec<T>, Option<ApiError>) {
        (self.items, self.last_error)
    }

    /// Discard partial progress and fail if anything went wrong.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.last_error {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }
}
