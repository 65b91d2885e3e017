//! Per-dialogue session storage for the HTTP server

use super::session::ConversationSession;
use crate::config::ConversationSettings;
use crate::error::ProviderError;
use crate::provider::SearchProvider;
use moka::future::Cache;
use moka::notification::{ListenerFuture, RemovalCause};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A session shared between requests of the same dialogue
pub type SharedSession = Arc<Mutex<ConversationSession>>;

/// Sessions keyed by a generated dialogue id.
///
/// Dialogues idle for longer than the configured timeout, or pushed out by
/// the capacity bound, have their remote conversation deleted as well.
pub struct SessionStore {
    provider: Arc<dyn SearchProvider>,
    settings: ConversationSettings,
    sessions: Cache<String, SharedSession>,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: ConversationSettings) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(Duration::from_secs(settings.session_idle_timeout.max(1)))
            .max_capacity(settings.max_sessions)
            .async_eviction_listener(close_evicted)
            .build();

        Self {
            provider,
            settings,
            sessions,
        }
    }

    /// Create a new provider conversation and register it under a fresh id
    pub async fn open(&self) -> Result<(String, SharedSession), ProviderError> {
        let mut session = ConversationSession::new(self.provider.clone(), &self.settings);
        session.create().await?;

        let id = uuid::Uuid::new_v4().to_string();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id.clone(), shared.clone()).await;
        debug!("Registered dialogue {}", id);

        Ok((id, shared))
    }

    /// Look up a live dialogue
    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    /// Forget a dialogue and delete its remote conversation
    pub async fn close(&self, id: &str) -> bool {
        match self.sessions.remove(id).await {
            Some(session) => {
                session.lock().await.close().await;
                true
            }
            None => false,
        }
    }

    /// Approximate number of live dialogues
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) async fn run_pending_tasks(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

fn close_evicted(id: Arc<String>, session: SharedSession, cause: RemovalCause) -> ListenerFuture {
    Box::pin(async move {
        // Explicit removals are closed by `SessionStore::close`
        if cause.was_evicted() {
            info!("Dialogue {} evicted ({:?})", id, cause);
            session.lock().await.close().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{Call, MockProvider};

    #[tokio::test]
    async fn test_open_get_close() {
        let provider = Arc::new(MockProvider::new());
        let store = SessionStore::new(provider.clone(), ConversationSettings::default());

        let (id, session) = store.open().await.unwrap();
        assert!(session.lock().await.is_active());
        assert!(store.get(&id).await.is_some());

        assert!(store.close(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(!store.close(&id).await);
        assert!(matches!(provider.calls().last(), Some(Call::Delete(_))));
    }

    #[tokio::test]
    async fn test_dialogues_are_independent() {
        let store = SessionStore::new(Arc::new(MockProvider::new()), ConversationSettings::default());

        let (a, first) = store.open().await.unwrap();
        let (b, second) = store.open().await.unwrap();

        assert_ne!(a, b);
        assert_ne!(
            first.lock().await.handle().cloned(),
            second.lock().await.handle().cloned()
        );
    }

    #[tokio::test]
    async fn test_idle_dialogue_deletes_remote_conversation() {
        let provider = Arc::new(MockProvider::new());
        let settings = ConversationSettings {
            session_idle_timeout: 1,
            ..Default::default()
        };
        let store = SessionStore::new(provider.clone(), settings);

        let (id, session) = store.open().await.unwrap();
        let handle = session.lock().await.handle().cloned().unwrap();
        drop(session);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(store.get(&id).await.is_none());
        store.run_pending_tasks().await;

        assert_eq!(provider.calls().last(), Some(&Call::Delete(handle)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_close_deletes_once() {
        let provider = Arc::new(MockProvider::new());
        let store = SessionStore::new(provider.clone(), ConversationSettings::default());

        let (id, _) = store.open().await.unwrap();
        store.close(&id).await;
        store.run_pending_tasks().await;

        let deletes = provider
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Delete(_)))
            .count();
        assert_eq!(deletes, 1);
    }

    #[tokio::test]
    async fn test_open_propagates_provider_failure() {
        let store = SessionStore::new(
            Arc::new(MockProvider::failing(ProviderError::InvalidConfiguration("bad".into()))),
            ConversationSettings::default(),
        );
        assert!(matches!(
            store.open().await,
            Err(ProviderError::InvalidConfiguration(_))
        ));
    }
}
