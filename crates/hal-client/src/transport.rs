//! # Transport Trait
//!
//! The navigation core never talks HTTP itself. It hands a concrete URI to an
//! injected [`Transport`] and gets back an [`HttpResponse`]. Retries, timeouts and
//! cancellation all belong to the transport.
//!
//! Two implementations ship with the crate:
//! - [`ReqwestTransport`](crate::http::ReqwestTransport) for real APIs.
//! - [`MockTransport`](crate::mock::MockTransport) for tests.

use crate::error::HalError;
use async_trait::async_trait;

/// An encoded request body together with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Payload {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// What a transport hands back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with the given name, compared ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// One method per HTTP verb the navigator issues.
///
/// A returned `Err` means the call could not be completed at all. A completed call
/// with a non-2xx status is an `Ok` response; judging it is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str) -> Result<HttpResponse, HalError>;

    async fn post(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError>;

    async fn put(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError>;

    async fn patch(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError>;

    async fn delete(&self, uri: &str) -> Result<HttpResponse, HalError>;
}
