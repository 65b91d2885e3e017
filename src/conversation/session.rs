//! Conversation session state machine

use crate::config::ConversationSettings;
use crate::error::ProviderError;
use crate::provider::{ConversationHandle, ConverseRequest, SearchProvider};
use crate::results::{normalize_all, NormalizedResult};
use crate::search::SummarySpec;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One query/reply exchange with its grounding results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub query: String,
    pub reply: String,
    pub results: Vec<NormalizedResult>,
}

impl Turn {
    /// Human-readable rendering: the reply, then link, first snippet and
    /// first extractive answer of every grounding result
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Reply: {}\n", self.reply);

        for (i, result) in self.results.iter().enumerate() {
            let _ = writeln!(out, "[{}]", i + 1);
            let _ = writeln!(out, "Link: {}", result.text("link").unwrap_or("-"));
            let _ = writeln!(
                out,
                "First Snippet: {}",
                result.nested_text("snippets", "snippet").unwrap_or("-")
            );
            let _ = writeln!(
                out,
                "First Extractive Answer: \n\tContent: {}\n",
                result
                    .nested_text("extractive_answers", "content")
                    .unwrap_or("-")
            );
        }
        out.push('\n');
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Uninitialized,
    Active(ConversationHandle),
}

/// A single multi-turn dialogue with the provider.
///
/// Context lives server-side behind the handle; the session keeps no
/// local history. Turns take `&mut self`, so one session never has two
/// turns in flight.
pub struct ConversationSession {
    provider: Arc<dyn SearchProvider>,
    summary_spec: SummarySpec,
    state: SessionState,
    turns: u64,
}

impl ConversationSession {
    /// Create an uninitialized session
    pub fn new(provider: Arc<dyn SearchProvider>, settings: &ConversationSettings) -> Self {
        Self {
            provider,
            summary_spec: SummarySpec::new(settings.summary_result_count, settings.include_citations),
            state: SessionState::Uninitialized,
            turns: 0,
        }
    }

    /// Start a brand-new conversation, replacing any current one
    pub async fn create(&mut self) -> Result<ConversationHandle, ProviderError> {
        let handle = self.provider.create_conversation().await?;
        if let SessionState::Active(ref previous) = self.state {
            debug!("Replacing conversation {} with {}", previous, handle);
        }
        info!("Conversation {} started", handle);
        self.state = SessionState::Active(handle.clone());
        self.turns = 0;
        Ok(handle)
    }

    /// Send one turn and wait for the reply
    pub async fn converse(&mut self, query: &str) -> Result<Turn, ProviderError> {
        let SessionState::Active(ref handle) = self.state else {
            return Err(ProviderError::SessionNotActive);
        };

        let request = ConverseRequest {
            query: query.to_string(),
            summary_spec: self.summary_spec.clone(),
        };
        let response = self.provider.converse(handle, &request).await?;
        self.turns += 1;

        debug!(
            "Turn {} on {}: {} grounding results",
            self.turns,
            handle,
            response.results.len()
        );

        Ok(Turn {
            query: query.to_string(),
            reply: response.reply,
            results: normalize_all(&response.results),
        })
    }

    /// Delete the remote conversation if there is one; failures are only logged
    pub async fn close(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::Uninitialized);
        if let SessionState::Active(handle) = state {
            match self.provider.delete_conversation(&handle).await {
                Ok(()) => info!("Conversation {} closed after {} turns", handle, self.turns),
                Err(e) => warn!("Failed to delete conversation {}: {}", handle, e),
            }
        }
        self.turns = 0;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn handle(&self) -> Option<&ConversationHandle> {
        match &self.state {
            SessionState::Active(handle) => Some(handle),
            SessionState::Uninitialized => None,
        }
    }

    /// Turns completed on the current handle
    pub fn turn_count(&self) -> u64 {
        self.turns
    }
}
