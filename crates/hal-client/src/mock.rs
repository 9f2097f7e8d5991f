//! # Mock Transport
//!
//! An in-memory [`Transport`] for testing navigation without a server.
//!
//! Queue the calls you expect, in order, with the response each should get. The
//! mock records every request it sees, so tests can also assert that a navigation
//! made *no* call at all. A request that does not match the next expectation
//! panics with both sides of the mismatch.
//!
//! | Need | Use |
//! |------|-----|
//! | HAL body | `expect_get(uri).return_json(200, json!({..}))` |
//! | Failure status | `expect_get(uri).return_status(500)` |
//! | Transport failure | `expect_get(uri).return_err(HalError::Transport(..))` |
//! | "no network call" | `assert!(mock.requests().is_empty())` |
//!
//! # Example
//! ```rust
//! use hal_client::mock::MockTransport;
//! use hal_client::{Follow, Navigator};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/").return_json(200, json!({
//!         "_links": { "orders": { "href": "/orders" } }
//!     }));
//!     mock.expect_get("/orders").return_json(200, json!({ "count": 0 }));
//!
//!     let root = Navigator::new(mock.clone()).root_at("/").await.unwrap();
//!     let orders = root.get("orders", Follow::new()).await.unwrap();
//!
//!     assert_eq!(orders.current()[0].data["count"], 0);
//!     mock.verify();
//! }
//! ```

use crate::codec::HAL_JSON;
use crate::error::HalError;
use crate::transport::{HttpResponse, Payload, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request the mock has seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub payload: Option<Payload>,
}

impl RecordedRequest {
    /// The payload parsed as JSON, if there was one.
    pub fn json(&self) -> Option<Value> {
        self.payload
            .as_ref()
            .and_then(|payload| serde_json::from_slice(&payload.bytes).ok())
    }
}

struct Expectation {
    method: &'static str,
    uri: String,
    response: Result<HttpResponse, HalError>,
}

/// A transport with expectation tracking for fluent testing.
///
/// Clones share the same expectations and request log, so keep one handle for
/// assertions and give a clone to the [`Navigator`](crate::Navigator).
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get(&self, uri: impl Into<String>) -> ExpectationBuilder {
        self.expect("GET", uri)
    }

    pub fn expect_post(&self, uri: impl Into<String>) -> ExpectationBuilder {
        self.expect("POST", uri)
    }

    pub fn expect_put(&self, uri: impl Into<String>) -> ExpectationBuilder {
        self.expect("PUT", uri)
    }

    pub fn expect_patch(&self, uri: impl Into<String>) -> ExpectationBuilder {
        self.expect("PATCH", uri)
    }

    pub fn expect_delete(&self, uri: impl Into<String>) -> ExpectationBuilder {
        self.expect("DELETE", uri)
    }

    fn expect(&self, method: &'static str, uri: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            uri: uri.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap();
        if !remaining.is_empty() {
            let pending: Vec<_> = remaining.iter().map(|e| format!("{} {}", e.method, e.uri)).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", pending.len(), pending);
        }
    }

    fn respond(
        &self,
        method: &'static str,
        uri: &str,
        payload: Option<Payload>,
    ) -> Result<HttpResponse, HalError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            uri: uri.to_string(),
            payload,
        });

        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(expected) if expected.method == method && expected.uri == uri => expected.response,
            Some(expected) => panic!(
                "Unexpected request: got {method} {uri}, expected {} {}",
                expected.method, expected.uri
            ),
            None => panic!("Unexpected request: got {method} {uri}, no expectations left"),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, uri: &str) -> Result<HttpResponse, HalError> {
        self.respond("GET", uri, None)
    }

    async fn post(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.respond("POST", uri, Some(payload))
    }

    async fn put(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.respond("PUT", uri, Some(payload))
    }

    async fn patch(&self, uri: &str, payload: Payload) -> Result<HttpResponse, HalError> {
        self.respond("PATCH", uri, Some(payload))
    }

    async fn delete(&self, uri: &str) -> Result<HttpResponse, HalError> {
        self.respond("DELETE", uri, None)
    }
}

/// Builder for one expected request.
pub struct ExpectationBuilder {
    method: &'static str,
    uri: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Responds with `body` as `application/hal+json`.
    pub fn return_json(self, status: u16, body: Value) {
        let response = HttpResponse::new(status)
            .with_header("Content-Type", HAL_JSON)
            .with_body(body.to_string());
        self.return_response(response);
    }

    /// Responds with a bare status and no body.
    pub fn return_status(self, status: u16) {
        self.return_response(HttpResponse::new(status));
    }

    pub fn return_response(self, response: HttpResponse) {
        self.push(Ok(response));
    }

    /// Fails the call at the transport level.
    pub fn return_err(self, error: HalError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse, HalError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            method: self.method,
            uri: self.uri,
            response,
        });
    }
}
