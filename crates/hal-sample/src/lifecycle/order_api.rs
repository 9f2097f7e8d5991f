use crate::clients::{OrderClient, OrderError};
use hal_client::{Navigator, ReqwestTransport, Transport, TransportConfig};
use tracing::{info, instrument, warn};

/// Entry point to the order API: one rooted navigator shared by all clients.
#[derive(Clone, Debug)]
pub struct OrderApi {
    pub order_client: OrderClient,
}

impl OrderApi {
    /// Builds an HTTP transport from `config` and navigates to the API root.
    #[instrument(skip(config), fields(base_url = ?config.base_url))]
    pub async fn connect(config: TransportConfig, curie: Option<String>) -> Result<Self, OrderError> {
        let transport = ReqwestTransport::new(config)?;
        Self::start(transport, curie).await
    }

    /// Navigates to the root through any transport.
    pub async fn start(transport: impl Transport + 'static, curie: Option<String>) -> Result<Self, OrderError> {
        info!("Navigating to API root");
        let root = Navigator::new(transport).root().await?;

        if !root.has("order", curie.as_deref()) {
            warn!(curie = ?curie, "API root does not expose an order relation");
        }

        Ok(Self {
            order_client: OrderClient::new(root, curie),
        })
    }
}
