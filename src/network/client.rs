//! HTTP client for making requests to the search provider

use super::request::{HttpMethod, ProviderRequest, ProviderResponse};
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// HTTP client wrapper with provider-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    access_token: Option<String>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&ProviderSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &ProviderSettings) -> Result<Self> {
        let request_timeout = Duration::try_from_secs_f64(settings.request_timeout)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "provider.request_timeout must be a positive number of seconds, got {}",
                    settings.request_timeout
                )
            })?;
        let client = Client::builder()
            .timeout(request_timeout)
            .gzip(true)
            .user_agent(concat!("discovery-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            default_timeout: request_timeout,
            access_token: settings.access_token.clone().filter(|t| !t.is_empty()),
            max_retries: settings.max_retries,
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    /// Set the number of retries for transient failures
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    /// Execute a provider request, retrying transient failures with exponential backoff
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let max_attempts = self.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            match self.execute_once(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if request.retryable && e.is_transient() && attempt + 1 < max_attempts => {
                    let multiplier = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
                    let delay = self
                        .retry_backoff
                        .saturating_mul(multiplier)
                        .min(self.default_timeout);
                    warn!(
                        "Transient failure on {} (attempt {}/{}): {}; retrying in {:?}",
                        request.url,
                        attempt + 1,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Execute a request once, bounded by the default timeout
    async fn execute_once(&self, request: &ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut req_builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        req_builder = req_builder.header("Accept", "application/json");

        if let Some(ref token) = self.access_token {
            req_builder = req_builder.bearer_auth(token);
        }

        if let Some(ref body) = request.body {
            req_builder = req_builder.json(body);
        }

        debug!("{:?} {}", request.method, request.url);

        let exchange = async {
            let response = req_builder.send().await?;
            Self::parse_response(response).await
        };

        match timeout(self.default_timeout, exchange).await {
            Ok(Ok(response)) => response.error_for_status(),
            Ok(Err(e)) if e.is_timeout() => Err(ProviderError::Timeout(self.default_timeout)),
            Ok(Err(e)) => Err(ProviderError::unavailable(e.to_string())),
            Err(_) => Err(ProviderError::Timeout(self.default_timeout)),
        }
    }

    /// POST with JSON body
    pub async fn post_json(
        &self,
        url: &str,
        json: serde_json::Value,
    ) -> Result<ProviderResponse, ProviderError> {
        self.execute(ProviderRequest::post(url).json(json)).await
    }

    /// POST with JSON body, never retried
    pub async fn post_json_once(
        &self,
        url: &str,
        json: serde_json::Value,
    ) -> Result<ProviderResponse, ProviderError> {
        self.execute(ProviderRequest::post(url).json(json).once()).await
    }

    /// Simple DELETE request
    pub async fn delete(&self, url: &str) -> Result<ProviderResponse, ProviderError> {
        self.execute(ProviderRequest::delete(url)).await
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> reqwest::Result<ProviderResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(ProviderResponse { status, text })
    }

    /// Request timeout applied to every call
    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }
}
