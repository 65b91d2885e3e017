//! discovery-search: single-shot and conversational search over a managed
//! Discovery Engine data store.
//!
//! Ranking, summarization, spell correction and multi-turn state all live
//! in the remote service. This crate normalizes its heterogeneous result
//! documents and manages the conversation contract around it.

pub mod config;
pub mod conversation;
pub mod error;
pub mod network;
pub mod provider;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use conversation::{ConversationSession, Dialogue, ExitSentinel, Turn};
pub use error::ProviderError;
pub use provider::{DiscoveryEngineProvider, SearchProvider};
pub use results::{normalize, NormalizedResult, RawDocument};
pub use search::{Search, SearchOutcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
