//! # HAL Sample Library
//!
//! This library exposes the order API client modules for integration testing.

pub mod clients;
pub mod lifecycle;
pub mod model;
