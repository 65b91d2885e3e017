//! Web server module
//!
//! Provides the HTTP endpoint and static form for discovery-search.

mod error;
mod handlers;
mod routes;
mod state;
mod templates;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
