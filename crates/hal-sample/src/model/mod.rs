//! Payload shapes exchanged with the order API.

pub mod order;
pub mod order_item;

pub use order::*;
pub use order_item::*;
