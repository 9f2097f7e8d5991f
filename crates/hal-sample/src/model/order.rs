use serde::{Deserialize, Serialize};

/// An order as the API represents it.
///
/// Navigation metadata (`self` href, links, embedded items) lives on the
/// surrounding [`Resource`](hal_client::Resource), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_ref: String,
    pub user_ref: u32,
    pub status: String,
    pub total: f64,
}

/// Payload for placing a new order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAdd {
    pub order_ref: String,
    pub user_ref: u32,
    pub total: f64,
}

/// Partial update of an existing order. Unset fields are left out of the body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl OrderEdit {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }
}
