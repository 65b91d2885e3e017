//! Search provider module
//!
//! The external service that ranks, retrieves and summarizes. Everything
//! else in the crate talks to it through the [`SearchProvider`] trait.

mod discovery;
mod paths;
mod traits;

pub use discovery::DiscoveryEngineProvider;
pub use paths::{default_endpoint, DataStorePath};
pub use traits::*;

#[cfg(test)]
pub(crate) mod testing;
