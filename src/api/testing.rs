//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::StatusCode;

use super::error::{ApiError, Result};
use super::transport::{Request, Transport};

enum Reply {
    Body(Vec<u8>),
    Status(u16),
}

/// Answers requests from a fixed URL table and records every request.
///
/// Unknown URLs fail with `ApiError::NotFound`.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(body.as_bytes().to_vec()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn execute(&self, request: &Request) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());

        match self.replies.get(&request.url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(code)) => Err(ApiError::from_status(
                StatusCode::from_u16(*code).unwrap(),
                &request.url,
            )),
            None => Err(ApiError::NotFound(request.url.clone())),
        }
    }
}
