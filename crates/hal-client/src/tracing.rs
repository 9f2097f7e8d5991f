//! # Observability & Tracing
//!
//! Structured logging for navigation, built on the `tracing` crate.
//!
//! Every navigator verb opens a span named after itself, with the relation and
//! curie as fields. Inside it the execution pipeline logs:
//!
//! - `DEBUG Sending request method=GET uri=/v1/order/123` before the call
//! - `INFO Navigated method=GET uri=/v1/order/123 status=200` on success
//! - `WARN Request failed method=GET uri=/v1/order/999 status=404` on any non-2xx
//!
//! Relations answered from `_embedded` log `DEBUG Resolved to embedded resources`
//! and no request lines at all.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run      # One line per HTTP call
//! RUST_LOG=debug cargo run     # Requests, embedded hits, codec fallbacks
//! RUST_LOG=hal_client=trace cargo run
//! ```
//!
//! With `RUST_LOG=info` a lookup followed by an embedded hop reads:
//!
//! ```text
//! INFO find_order:get{rel="order" curie=Some("ns")}: Navigated method=GET uri=/v1/order?orderRef=123 status=200
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Span names already say where a line comes from
        .compact() // Shows spans inline (e.g., "find_order:get")
        .init();
}
