//! Error types for the order client.

use hal_client::HalError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The API answered 404 for the order or its listing.
    #[error("Order not found")]
    NotFound,

    /// Any other navigation failure: missing relation, bad status, transport.
    #[error("Order navigation failed: {0}")]
    Navigation(#[source] HalError),
}

impl From<HalError> for OrderError {
    fn from(error: HalError) -> Self {
        match error {
            HalError::HttpRequestFailed { status: 404 } => OrderError::NotFound,
            other => OrderError::Navigation(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_split_out() {
        assert!(matches!(
            OrderError::from(HalError::HttpRequestFailed { status: 404 }),
            OrderError::NotFound
        ));
        assert!(matches!(
            OrderError::from(HalError::HttpRequestFailed { status: 500 }),
            OrderError::Navigation(HalError::HttpRequestFailed { status: 500 })
        ));
        assert!(matches!(
            OrderError::from(HalError::RelationNotFound("ns:order".into())),
            OrderError::Navigation(HalError::RelationNotFound(_))
        ));
    }
}
