//! # Order Client
//!
//! Provides a high‑level API over the order relations of the API:
//!
//! | Call | Relation path |
//! |------|---------------|
//! | [`find_order`](OrderClient::find_order) | `order{?orderRef}` |
//! | [`orders_for_user`](OrderClient::orders_for_user) | `order-queryby-user{?userRef}` then embedded `order` |
//! | [`items_of`](OrderClient::items_of) | the order's `orderitem-query`, then `orderitem` |
//! | [`add_order`](OrderClient::add_order) | `order-add` |
//! | [`edit_order`](OrderClient::edit_order) | `order-edit{orderRef}` |
//! | [`delete_order`](OrderClient::delete_order) | `order-delete{orderRef}` |
use crate::clients::error::OrderError;
use crate::clients::resource_client::HalResourceClient;
use crate::model::{Order, OrderAdd, OrderEdit, OrderItem};
use async_trait::async_trait;
use hal_client::{HalError, Navigator, Parameters, Resource};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

/// Client for the order resources of the API.
#[derive(Clone, Debug)]
pub struct OrderClient {
    root: Navigator,
    curie: Option<String>,
}

impl OrderClient {
    pub fn new(root: Navigator, curie: Option<String>) -> Self {
        Self { root, curie }
    }

    #[instrument(skip(self))]
    pub async fn find_order(&self, order_ref: &str) -> Result<Resource<Order>, OrderError> {
        debug!("find_order called");
        self.fetch("order", by_order_ref(order_ref)).await
    }

    /// All orders of a user, in page order. An empty page yields no orders.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_ref: u32) -> Result<Vec<Resource<Order>>, OrderError> {
        let page = self
            .root
            .get("order-queryby-user", self.follow().param("userRef", user_ref))
            .await?;
        let orders = self.list(&page, "order").await?;
        info!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// The items of one order, branching from the captured order resource.
    #[instrument(skip(self, order), fields(order_ref = %order.data.order_ref))]
    pub async fn items_of(&self, order: &Resource<Order>) -> Result<Vec<Resource<OrderItem>>, OrderError> {
        let query = self
            .root
            .get_from(order, "orderitem-query", self.follow())
            .await?;
        self.list(&query, "orderitem").await
    }

    #[instrument(skip(self, order), fields(order_ref = %order.order_ref))]
    pub async fn add_order(&self, order: &OrderAdd) -> Result<Resource<Order>, OrderError> {
        debug!(?order, "add_order called");
        let created = self.root.post("order-add", order, self.follow()).await?;
        info!("Order added");
        Ok(created.item()?)
    }

    #[instrument(skip(self, edit))]
    pub async fn edit_order(&self, order_ref: &str, edit: &OrderEdit) -> Result<(), OrderError> {
        debug!(?edit, "edit_order called");
        self.root
            .patch("order-edit", edit, self.follow().parameters(by_order_ref(order_ref)))
            .await?;
        info!("Order edited");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_ref: &str) -> Result<(), OrderError> {
        self.remove("order-delete", by_order_ref(order_ref)).await?;
        info!("Order deleted");
        Ok(())
    }

    /// Every resource under `rel` in `state`, or none when the relation is absent.
    async fn list<T: DeserializeOwned>(&self, state: &Navigator, rel: &str) -> Result<Vec<Resource<T>>, OrderError> {
        if !state.has(rel, self.curie()) {
            debug!(rel, "Relation absent, nothing to list");
            return Ok(Vec::new());
        }
        let listed = state.get(rel, self.follow()).await?;
        Ok(listed.items()?)
    }
}

fn by_order_ref(order_ref: &str) -> Parameters {
    Parameters::new().with("orderRef", order_ref)
}

#[async_trait]
impl HalResourceClient for OrderClient {
    type Error = OrderError;

    fn root(&self) -> &Navigator {
        &self.root
    }

    fn curie(&self) -> Option<&str> {
        self.curie.as_deref()
    }

    fn map_error(e: HalError) -> Self::Error {
        OrderError::from(e)
    }
}
