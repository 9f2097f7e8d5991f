//! # HAL Client Sample
//!
//! Walks an order API the way a real consumer would, discovering every URL from
//! the API's own links.
//!
//! ## 🚀 Core Components
//!
//! - **[model](hal_sample::model)**: Pure data structures ([`Order`](hal_sample::model::Order), [`OrderItem`](hal_sample::model::OrderItem)) decoded from HAL payloads.
//! - **[clients](hal_sample::clients)**: Type-safe wrappers (e.g., [`OrderClient`](hal_sample::clients::OrderClient)) that hide relation names and curies.
//! - **[lifecycle](hal_sample::lifecycle)**: Connects to the API root and hands out clients.
//!
//! ## 📚 Quick Start
//!
//! ```bash
//! HAL_BASE_URL=https://api.example.com/v1/ HAL_CURIE=ns RUST_LOG=info cargo run -p hal-sample -- 42
//! ```
//!
//! The optional argument is the user whose orders are listed (default `1`).
//! `HAL_BEARER_TOKEN` and `HAL_TIMEOUT_SECS` are honoured as well.
//!
//! ## 🧪 Testing
//!
//! See [`hal_client::mock`] for utilities to test clients without a server.

use hal_client::TransportConfig;
use hal_sample::lifecycle::{setup_tracing, OrderApi};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = TransportConfig::from_env();
    let curie = std::env::var("HAL_CURIE").ok();
    let user_ref = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<u32>().map_err(|e| format!("invalid user ref '{raw}': {e}"))?,
        None => 1,
    };

    info!(base_url = ?config.base_url, curie = ?curie, "Starting order walk");

    let api = OrderApi::connect(config, curie)
        .await
        .map_err(|e| e.to_string())?;
    let client = api.order_client;

    let span = tracing::info_span!("user_orders", user_ref);
    let orders = async {
        info!("Listing orders");
        client.orders_for_user(user_ref).await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    for order in &orders {
        let span = tracing::info_span!("order", order_ref = %order.data.order_ref);
        let items = client.items_of(order).instrument(span).await;

        match items {
            Ok(items) => {
                let total: f64 = items.iter().map(|item| item.data.subtotal()).sum();
                for item in &items {
                    info!(sku = %item.data.sku, quantity = item.data.quantity, "Item");
                }
                info!(order_ref = %order.data.order_ref, status = %order.data.status, total, "Order");
            }
            Err(e) => error!(order_ref = %order.data.order_ref, error = %e, "Could not load items"),
        }
    }

    info!(count = orders.len(), "Order walk completed");
    Ok(())
}
