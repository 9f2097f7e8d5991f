//! # HAL Client
//!
//! A client for navigating hypermedia APIs that speak HAL+JSON. Instead of
//! hard-coding URLs, callers name *relations* (`order`, `ns:orderitem`) and the
//! client discovers where they lead from the `_links` and `_embedded` sections of
//! the documents it has already fetched.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into four layers:
//!
//! 1. **Model** ([`Resource`], [`Link`], [`RelationKey`]) - Immutable decoded documents
//! 2. **Resolution** ([`resolver`], [`template`]) - Pure lookups and RFC 6570 expansion
//! 3. **Execution** ([`pipeline`]) - One HTTP call into one new navigation state
//! 4. **Navigation** ([`Navigator`]) - The fluent, branchable API callers use
//!
//! I/O happens behind the [`Transport`] trait. [`ReqwestTransport`] talks to real
//! servers; [`mock::MockTransport`] scripts responses for tests.
//!
//! ## Navigation Model
//!
//! A [`Navigator`] never changes. Each verb returns a new state and leaves the old
//! one as it was, so a state can be kept, retried after a failure, or followed in
//! two directions at once:
//!
//! ```rust
//! use hal_client::mock::MockTransport;
//! use hal_client::{Follow, Navigator};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Order {
//!     order_ref: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect_get("/v1").return_json(200, json!({
//!         "_links": {
//!             "ns:order": { "href": "/v1/order{?orderRef}", "templated": true }
//!         }
//!     }));
//!     mock.expect_get("/v1/order?orderRef=123").return_json(200, json!({
//!         "orderRef": "123",
//!         "_embedded": {
//!             "ns:orderitem": [{ "sku": "a" }, { "sku": "b" }]
//!         }
//!     }));
//!
//!     let root = Navigator::new(mock.clone()).root_at("/v1").await.unwrap();
//!     let order = root
//!         .get("order", Follow::with_curie("ns").param("OrderRef", "123"))
//!         .await
//!         .unwrap();
//!     assert_eq!(order.item::<Order>().unwrap().data.order_ref, "123");
//!
//!     // Embedded items: no further HTTP call.
//!     let items = order.get("orderitem", Follow::with_curie("ns")).await.unwrap();
//!     assert_eq!(items.current().len(), 2);
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Resolution Rules
//!
//! - Embedded resources win over links, across all current resources.
//! - Mutating verbs (`post`, `put`, `patch`, `delete`) only ever follow links.
//! - Templated links need parameters; names match variables ignoring case.
//! - Any non-2xx status fails with [`HalError::HttpRequestFailed`]; no retries.
//!
//! ## Testing
//!
//! The [`mock`] module provides a `MockTransport` with the same expectation-builder
//! style as the rest of the workspace's test helpers. Every navigator verb can be
//! exercised without a server, including assertions that a step made no request.

pub mod blocking;
pub mod codec;
pub mod error;
pub mod http;
pub mod mock;
pub mod model;
pub mod navigator;
pub mod pipeline;
pub mod resolver;
pub mod template;
pub mod tracing;
pub mod transport;

// Re-export core types for convenience
pub use blocking::BlockingNavigator;
pub use codec::{Codec, Codecs, HalJsonCodec};
pub use error::HalError;
pub use http::{ReqwestTransport, TransportConfig};
pub use model::{Link, RelationKey, Resource};
pub use navigator::{Follow, Navigator};
pub use pipeline::Request;
pub use resolver::Match;
pub use template::{Parameters, TemplateValue};
pub use transport::{HttpResponse, Payload, Transport};
