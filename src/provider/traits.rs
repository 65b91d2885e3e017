//! Search provider trait and types

use crate::error::ProviderError;
use crate::results::RawDocument;
use crate::search::{SearchRequest, SummarySpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-side identifier of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHandle(String);

impl ConversationHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw result of a single-shot search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Matched documents
    pub results: Vec<RawDocument>,
    /// Generated summary text (empty when none was produced)
    pub summary: String,
    /// Spell-corrected query, if the provider rewrote it
    pub corrected_query: Option<String>,
    /// Estimated total number of matches
    pub total_size: Option<u64>,
}

/// One conversation turn sent to the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseRequest {
    pub query: String,
    pub summary_spec: SummarySpec,
}

/// Reply to one conversation turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverseResponse {
    /// Reply summary text
    pub reply: String,
    /// Grounding search results
    pub results: Vec<RawDocument>,
}

/// Capability of the external search service
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Run one single-shot search
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ProviderError>;

    /// Start a new, unrelated conversation
    async fn create_conversation(&self) -> Result<ConversationHandle, ProviderError>;

    /// Send one turn within an existing conversation
    async fn converse(
        &self,
        handle: &ConversationHandle,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, ProviderError>;

    /// Delete a conversation; providers without explicit teardown do nothing
    async fn delete_conversation(&self, _handle: &ConversationHandle) -> Result<(), ProviderError> {
        Ok(())
    }
}
