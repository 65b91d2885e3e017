//! Scripted in-memory provider for unit tests

use super::traits::*;
use crate::error::ProviderError;
use crate::results::{FieldValue, RawDocument};
use crate::search::SearchRequest;
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A provider call as observed by [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Create(ConversationHandle),
    Converse(ConversationHandle, String),
    Delete(ConversationHandle),
}

#[derive(Default)]
pub struct MockProvider {
    calls: Mutex<Vec<Call>>,
    conversations: AtomicU64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    turn_delay: Option<Duration>,
    failure: Option<ProviderError>,
    turn_failure: Option<ProviderError>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call with `error`
    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Create conversations normally but fail every turn with `error`
    pub fn failing_turns(error: ProviderError) -> Self {
        Self {
            turn_failure: Some(error),
            ..Default::default()
        }
    }

    /// Hold each turn open for `delay`
    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_concurrent_turns(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub fn document(id: &str, link: &str, snippet: &str, answer: &str) -> RawDocument {
    RawDocument::new(id)
        .with_field("link", FieldValue::Text(link.to_string()))
        .with_field(
            "snippets",
            FieldValue::Composite(vec![
                json!({"snippet": snippet}).as_object().cloned().unwrap_or_default(),
                json!({"snippet": "ignored"}).as_object().cloned().unwrap_or_default(),
            ]),
        )
        .with_field(
            "extractive_answers",
            FieldValue::Composite(vec![json!({"content": answer, "pageNumber": "1"})
                .as_object()
                .cloned()
                .unwrap_or_default()]),
        )
        .with_field("score", FieldValue::Unsupported)
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ProviderError> {
        self.record(Call::Search(request.query.clone()))?;
        Ok(SearchResponse {
            results: vec![
                document("1", "gs://kms/kuota.pdf", "Sisa kuota adalah", "Kuota tersisa"),
                document("2", "gs://kms/paket.pdf", "Paket data", "Paket"),
            ],
            summary: format!("Summary for {}", request.query),
            corrected_query: None,
            total_size: Some(2),
        })
    }

    async fn create_conversation(&self) -> Result<ConversationHandle, ProviderError> {
        let n = self.conversations.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = ConversationHandle::new(format!(
            "projects/p/locations/global/dataStores/kms/conversations/{}",
            n
        ));
        self.record(Call::Create(handle.clone()))?;
        Ok(handle)
    }

    async fn converse(
        &self,
        handle: &ConversationHandle,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, ProviderError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.turn_delay {
            tokio::time::sleep(delay).await;
        }
        let recorded = self.record(Call::Converse(handle.clone(), request.query.clone()));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        recorded?;
        if let Some(e) = &self.turn_failure {
            return Err(e.clone());
        }

        Ok(ConverseResponse {
            reply: format!("Reply to {}", request.query),
            results: vec![document("1", "gs://kms/kuota.pdf", "Sisa kuota adalah", "Kuota tersisa")],
        })
    }

    async fn delete_conversation(&self, handle: &ConversationHandle) -> Result<(), ProviderError> {
        self.record(Call::Delete(handle.clone()))
    }
}
