//! # Navigation Errors
//!
//! Every operation in this crate fails with a [`HalError`]. A failed call never
//! touches the [`Navigator`](crate::Navigator) it was made on, so the caller can
//! retry or pick a different relation from the same state.

/// Errors that can occur while navigating a HAL API.
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    /// The relation matches no embedded resource and no link in scope.
    #[error("Failed to resolve relationship: {0}")]
    RelationNotFound(String),

    /// The resolved link is templated but no parameters were supplied.
    #[error("Template parameters are required for link: {href}")]
    TemplateParametersRequired { href: String },

    /// A typed projection was requested before any navigation happened.
    #[error("No active resource: navigate to a resource first")]
    NoActiveResource,

    /// The transport completed the call with a non-success status.
    #[error("HTTP request failed with status {status}")]
    HttpRequestFailed { status: u16 },

    /// A body or payload could not be decoded into the requested shape.
    #[error("Failed to decode resource: {0}")]
    DecodeFailed(String),

    /// A caller payload could not be serialized.
    #[error("Failed to encode payload: {0}")]
    EncodeFailed(String),

    #[error("Malformed URI template '{href}': {reason}")]
    MalformedTemplate { href: String, reason: String },

    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The transport could not complete the call at all.
    #[error("Transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The blocking adapter could not start its runtime.
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl From<serde_json::Error> for HalError {
    fn from(error: serde_json::Error) -> Self {
        HalError::DecodeFailed(error.to_string())
    }
}
