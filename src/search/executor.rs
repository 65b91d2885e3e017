//! Single-shot search execution

use super::models::{SearchOutcome, SearchRequest};
use crate::config::SearchSettings;
use crate::error::ProviderError;
use crate::provider::SearchProvider;
use crate::results::normalize_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Search executor issuing one provider call per query
pub struct Search {
    /// Provider that runs the query
    provider: Arc<dyn SearchProvider>,
    /// Content search options applied to every request
    settings: SearchSettings,
}

impl Search {
    /// Create a new search executor
    pub fn new(provider: Arc<dyn SearchProvider>, settings: SearchSettings) -> Self {
        Self { provider, settings }
    }

    /// Build the provider request for `query`
    pub fn request_for(&self, query: &str) -> SearchRequest {
        SearchRequest::from_settings(query, &self.settings)
    }

    /// Run `query` and return normalized results with the summary.
    ///
    /// Results and summary both come from the same provider response.
    pub async fn execute(&self, query: &str) -> Result<SearchOutcome, ProviderError> {
        self.execute_request(&self.request_for(query)).await
    }

    /// Run a fully built request
    pub async fn execute_request(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, ProviderError> {
        let start = Instant::now();
        info!(
            "Executing search '{}' on {}",
            request.query,
            self.provider.name()
        );

        let response = self.provider.search(request).await.map_err(|e| {
            warn!("Search '{}' failed: {}", request.query, e);
            e
        })?;

        let outcome = SearchOutcome {
            results: normalize_all(&response.results),
            summary: response.summary,
            corrected_query: response.corrected_query,
            total_size: response.total_size,
        };

        info!(
            "Search '{}' produced {} results in {:?}",
            request.query,
            outcome.results.len(),
            start.elapsed()
        );

        Ok(outcome)
    }
}
