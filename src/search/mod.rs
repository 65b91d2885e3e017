//! Single-shot search module
//!
//! Builds provider requests from configuration, runs them, and
//! normalizes the returned documents.

mod executor;
mod models;

pub use executor::Search;
pub use models::*;
