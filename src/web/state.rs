//! Application state shared across handlers

use crate::config::{ServerMode, Settings};
use crate::conversation::{ExitSentinel, SessionStore};
use crate::provider::SearchProvider;
use crate::search::Search;
use std::sync::Arc;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Single-shot search executor
    pub search: Arc<Search>,
    /// Live conversation dialogues
    pub sessions: Arc<SessionStore>,
    /// Local dialogue terminator
    pub sentinel: ExitSentinel,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state around one provider
    pub fn new(settings: Settings, provider: Arc<dyn SearchProvider>) -> anyhow::Result<Self> {
        let search = Arc::new(Search::new(provider.clone(), settings.search.clone()));
        let sessions = Arc::new(SessionStore::new(provider, settings.conversation.clone()));
        let sentinel = ExitSentinel::from_settings(&settings.conversation);
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            search,
            sessions,
            sentinel,
            templates,
        })
    }

    /// What the search endpoint does
    pub fn mode(&self) -> ServerMode {
        self.settings.server.mode
    }
}
