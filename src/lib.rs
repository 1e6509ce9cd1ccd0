//! product-recs — product recommendations over precomputed artifacts.
//!
//! Single-crate library providing artifact storage, sparse TF-IDF
//! processing, the recommendation engine, and the HTTP API and chat bot
//! front ends built on it.

// Core types
pub mod config;
pub mod constants;
pub mod error;
pub mod product;

// Sub-systems
pub mod storage;
pub mod processing;
pub mod intelligence;
pub mod api;
pub mod bot;
pub mod tracing_init;

#[cfg(test)]
mod test_helpers;

// Re-exports for convenience
pub use error::{RecError, RecResult};
pub use intelligence::RecommendationEngine;
