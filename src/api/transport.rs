//! HTTP transport.
//!
//! The client never talks to the network directly; it hands a [`Request`] to
//! a [`Transport`] and gets the raw response body back. [`HttpTransport`] is
//! the reqwest-backed implementation used in production.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode, Url};
use tracing::{debug, instrument};

use super::auth::Auth;
use super::decode::Format;
use super::error::{ApiError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body, if any.
    pub body: Option<String>,
    /// Media type for the `Accept` header.
    pub accept: &'static str,
}

impl Request {
    pub fn new(method: HttpMethod, url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body,
            accept: Format::Json.media_type(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, None)
    }

    /// Ask for `format` instead of JSON.
    pub fn accepting(mut self, format: Format) -> Self {
        self.accept = format.media_type();
        self
    }
}

/// Executes requests and returns raw response bodies.
///
/// Implementations own authentication, connection reuse and turning
/// transport-level failures (including non-2xx statuses) into errors.
/// A successful call may still return an empty or malformed body.
pub trait Transport {
    fn execute(&self, request: &Request) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// reqwest-backed transport with Basic authentication.
#[derive(Debug)]
pub struct HttpTransport {
    /// The HTTP client.
    client: Client,
    /// Authentication credentials.
    auth: Auth,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new(auth: Auth) -> Result<Self> {
        Self::with_timeout(auth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with an explicit request timeout.
    pub fn with_timeout(auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, auth })
    }

    /// Create an appropriate error from an HTTP response.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            // JIRA reports failures as {"errorMessages": [...], "errors": {...}}
            if let Some(messages) = json.get("errorMessages").and_then(|m| m.as_array()) {
                let messages: Vec<&str> = messages.iter().filter_map(|v| v.as_str()).collect();
                if !messages.is_empty() {
                    return ApiError::from_status(status, &messages.join(", "));
                }
            }
            if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
                let errors: Vec<String> = errors
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                if !errors.is_empty() {
                    return ApiError::from_status(status, &errors.join(", "));
                }
            }
        }

        ApiError::from_status(status, url)
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: &Request) -> Result<Vec<u8>> {
        let url = Url::parse(&request.url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, request.accept);

        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!(status = %status, len = bytes.len(), "Request succeeded");
            Ok(bytes.to_vec())
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(Self::error_from_response(status, &request.url, &error_body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_method_into_reqwest() {
        assert_eq!(Method::from(HttpMethod::Post), Method::POST);
        assert_eq!(Method::from(HttpMethod::Put), Method::PUT);
    }

    #[test]
    fn test_request_accepts_json_by_default() {
        assert_eq!(Request::get("http://jira/user").accept, "application/json");
        assert_eq!(
            Request::get("http://jira/activity").accepting(Format::Xml).accept,
            "application/atom+xml"
        );
    }

    #[test]
    fn test_error_from_response_uses_error_messages() {
        let err = HttpTransport::error_from_response(
            StatusCode::NOT_FOUND,
            "http://jira/user",
            r#"{"errorMessages": ["The user named 'ghost' does not exist"], "errors": {}}"#,
        );
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "The user named 'ghost' does not exist"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_response_uses_field_errors() {
        let err = HttpTransport::error_from_response(
            StatusCode::BAD_REQUEST,
            "http://jira/user",
            r#"{"errorMessages": [], "errors": {"emailAddress": "required"}}"#,
        );
        assert!(err.to_string().contains("emailAddress"));
    }

    #[test]
    fn test_error_from_response_falls_back_to_url() {
        let err = HttpTransport::error_from_response(StatusCode::FORBIDDEN, "http://jira/group", "");
        assert!(matches!(err, ApiError::Forbidden));

        let err =
            HttpTransport::error_from_response(StatusCode::BAD_GATEWAY, "http://jira/group", "<html/>");
        assert!(err.to_string().contains("http://jira/group"));
    }

    #[test]
    fn test_execute_rejects_invalid_url() {
        let transport = HttpTransport::new(Auth::new("user@example.com", "token")).unwrap();
        let result = tokio_test::block_on(transport.execute(&Request::get("not a url/rest")));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
