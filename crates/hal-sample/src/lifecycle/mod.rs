//! # API Lifecycle
//!
//! Wires the sample together: transport construction, the one root request every
//! session starts with, and the clients that branch from that root.
//!
//! ## The OrderApi Pattern
//!
//! ```rust,ignore
//! let config = TransportConfig::from_env();
//! let api = OrderApi::connect(config, Some("ns".to_string())).await?;
//!
//! let orders = api.order_client.orders_for_user(1).await?;
//! ```
//!
//! The root navigator is fetched once. Every client call starts from it and
//! produces new navigation states, so the root never goes stale and clients may
//! be cloned into concurrent tasks freely.
//!
//! ## Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the whole sample. Each
//! client call opens a span (`find_order`, `items_of`, ...) enclosing the
//! navigator's own `get`/`post` spans.
//!
//! ```bash
//! RUST_LOG=info cargo run -p hal-sample   # One line per HTTP call
//! RUST_LOG=debug cargo run -p hal-sample  # Payloads and embedded hops
//! ```

pub mod order_api;

pub use hal_client::tracing::setup_tracing;
pub use order_api::*;
