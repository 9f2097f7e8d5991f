//! Type-safe wrappers around a rooted [`Navigator`](hal_client::Navigator).

pub mod error;
pub mod order_client;
pub mod resource_client;

pub use error::*;
pub use order_client::*;
pub use resource_client::*;
