//! Shared types and models for the Stock Tracker
//!
//! This crate contains types shared between the backend and the form helpers
//! compiled to WASM. It performs no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
