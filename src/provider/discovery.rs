//! Discovery Engine REST provider

use super::paths::{default_endpoint, DataStorePath};
use super::traits::*;
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::results::{FieldMapping, RawDocument};
use crate::search::SearchRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireSearchResponse {
    results: Vec<WireResult>,
    summary: Option<WireSummary>,
    total_size: Option<u64>,
    corrected_query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireResult {
    id: String,
    document: Option<WireDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireDocument {
    id: String,
    name: String,
    derived_struct_data: Option<FieldMapping>,
    struct_data: Option<FieldMapping>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireSummary {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct WireConversation {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireConverseResponse {
    reply: Option<WireReply>,
    search_results: Vec<WireResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReply {
    summary: Option<WireSummary>,
}

/// Convert wire results to raw documents, skipping items without a document
fn into_documents(results: Vec<WireResult>) -> Vec<RawDocument> {
    results
        .into_iter()
        .filter_map(|result| {
            let Some(doc) = result.document else {
                warn!("Skipping result {:?} without a document", result.id);
                return None;
            };
            let data = doc.derived_struct_data.or(doc.struct_data).unwrap_or_default();
            Some(RawDocument::from_struct(doc.id, doc.name, data))
        })
        .collect()
}

/// Search provider backed by the Discovery Engine v1 REST API
pub struct DiscoveryEngineProvider {
    client: HttpClient,
    path: DataStorePath,
    endpoint: String,
}

impl DiscoveryEngineProvider {
    /// Create a provider, validating identifiers and endpoint up front
    pub fn new(settings: &ProviderSettings, client: HttpClient) -> Result<Self, ProviderError> {
        let path = DataStorePath::from_settings(settings)?;
        let endpoint = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(path.location()));

        url::Url::parse(&endpoint).map_err(|e| {
            ProviderError::InvalidConfiguration(format!("invalid endpoint {:?}: {}", endpoint, e))
        })?;

        info!(
            "Discovery Engine provider for {} via {}",
            path.data_store(),
            endpoint
        );

        Ok(Self {
            client,
            path,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// `{endpoint}/v1/{resource}` with an optional `:{verb}` suffix
    fn api_url(&self, resource: &str, verb: Option<&str>) -> String {
        match verb {
            Some(verb) => format!("{}/v1/{}:{}", self.endpoint, resource, verb),
            None => format!("{}/v1/{}", self.endpoint, resource),
        }
    }

    pub fn data_store_path(&self) -> &DataStorePath {
        &self.path
    }
}

#[async_trait]
impl SearchProvider for DiscoveryEngineProvider {
    fn name(&self) -> &str {
        "discovery_engine"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ProviderError> {
        let url = self.api_url(&self.path.serving_config(), Some("search"));
        let body = serde_json::to_value(request)
            .map_err(|e| ProviderError::InvalidConfiguration(e.to_string()))?;

        let start = Instant::now();
        let response = self.client.post_json(&url, body).await?;
        let wire: WireSearchResponse = response.json()?;

        debug!(
            "Search '{}' returned {} results in {:?}",
            request.query,
            wire.results.len(),
            start.elapsed()
        );

        Ok(SearchResponse {
            results: into_documents(wire.results),
            summary: wire.summary.map(|s| s.summary_text).unwrap_or_default(),
            corrected_query: wire.corrected_query.filter(|q| !q.is_empty()),
            total_size: wire.total_size,
        })
    }

    async fn create_conversation(&self) -> Result<ConversationHandle, ProviderError> {
        let url = self.api_url(&format!("{}/conversations", self.path.data_store()), None);
        let response = self.client.post_json_once(&url, json!({})).await?;
        let conversation: WireConversation = response.json()?;

        if conversation.name.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "conversation without a name".to_string(),
            ));
        }

        debug!("Created conversation {}", conversation.name);
        Ok(ConversationHandle::new(conversation.name))
    }

    async fn converse(
        &self,
        handle: &ConversationHandle,
        request: &ConverseRequest,
    ) -> Result<ConverseResponse, ProviderError> {
        let url = self.api_url(handle.as_str(), Some("converse"));
        let body = json!({
            "query": {"input": request.query},
            "servingConfig": self.path.serving_config(),
            "summarySpec": request.summary_spec,
        });

        let start = Instant::now();
        let response = self.client.post_json_once(&url, body).await?;
        let wire: WireConverseResponse = response.json()?;

        debug!(
            "Turn on {} returned {} grounding results in {:?}",
            handle,
            wire.search_results.len(),
            start.elapsed()
        );

        Ok(ConverseResponse {
            reply: wire
                .reply
                .and_then(|r| r.summary)
                .map(|s| s.summary_text)
                .unwrap_or_default(),
            results: into_documents(wire.search_results),
        })
    }

    async fn delete_conversation(&self, handle: &ConversationHandle) -> Result<(), ProviderError> {
        let url = self.api_url(handle.as_str(), None);
        self.client.delete(&url).await?;
        debug!("Deleted conversation {}", handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::FieldValue;

    fn settings() -> ProviderSettings {
        ProviderSettings {
            project_id: "sea-id-aid-genai".to_string(),
            data_store_id: "kms-agent-datastore".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_api_urls() {
        let provider = DiscoveryEngineProvider::new(&settings(), HttpClient::new().unwrap()).unwrap();
        assert_eq!(
            provider.api_url(&provider.data_store_path().serving_config(), Some("search")),
            "https://discoveryengine.googleapis.com/v1/projects/sea-id-aid-genai/locations/global/dataStores/kms-agent-datastore/servingConfigs/default_config:search"
        );
    }

    #[test]
    fn test_regional_endpoint() {
        let settings = ProviderSettings {
            location: "eu".to_string(),
            ..settings()
        };
        let provider = DiscoveryEngineProvider::new(&settings, HttpClient::new().unwrap()).unwrap();
        assert!(provider
            .api_url("x", None)
            .starts_with("https://eu-discoveryengine.googleapis.com/v1/"));
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let bad_ids = ProviderSettings {
            project_id: String::new(),
            ..settings()
        };
        assert!(matches!(
            DiscoveryEngineProvider::new(&bad_ids, HttpClient::new().unwrap()),
            Err(ProviderError::InvalidConfiguration(_))
        ));

        let bad_endpoint = ProviderSettings {
            endpoint: Some("not a url".to_string()),
            ..settings()
        };
        assert!(DiscoveryEngineProvider::new(&bad_endpoint, HttpClient::new().unwrap()).is_err());
    }

    #[test]
    fn test_into_documents_skips_missing_document() {
        let wire: WireSearchResponse = serde_json::from_value(json!({
            "results": [
                {"id": "a"},
                {"id": "b", "document": {"id": "b", "name": "docs/b", "derivedStructData": {"link": "gs://b"}}},
                {"id": "c", "document": {"id": "c", "name": "docs/c", "structData": {"rank": 4}}}
            ]
        }))
        .unwrap();

        let docs = into_documents(wire.results);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get("link"), Some(&FieldValue::Text("gs://b".into())));
        assert_eq!(docs[1].get("rank"), Some(&FieldValue::Integer(4)));
    }
}
