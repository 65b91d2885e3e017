//! Request and response types for provider calls

use crate::error::ProviderError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

/// HTTP request to be made against the provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// JSON body
    pub body: Option<serde_json::Value>,
    /// Whether a transient failure may be retried
    pub retryable: bool,
}

impl ProviderRequest {
    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            body: None,
            retryable: true,
        }
    }

    /// Create a DELETE request
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Delete,
            body: None,
            retryable: true,
        }
    }

    /// Add JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Send at most once. For calls that change remote state, where a lost
    /// response does not mean nothing happened.
    pub fn once(mut self) -> Self {
        self.retryable = false;
        self
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_str(&self.text).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into the matching error
    pub fn error_for_status(self) -> Result<Self, ProviderError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProviderError::from_status(self.status, &self.text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let request = ProviderRequest::post("https://x/v1/a:search").json(serde_json::json!({"query": "q"}));
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.body.is_some());
        assert!(request.retryable);
        assert!(!request.once().retryable);
        assert_eq!(ProviderRequest::delete("https://x").method, HttpMethod::Delete);
    }

    #[test]
    fn test_response_helpers() {
        let ok = ProviderResponse {
            status: 200,
            text: "{\"name\": \"c/1\"}".to_string(),
        };
        let value: serde_json::Value = ok.json().unwrap();
        assert_eq!(value["name"], "c/1");

        let garbled = ProviderResponse {
            status: 200,
            text: "<html>".to_string(),
        };
        assert!(matches!(
            garbled.json::<serde_json::Value>(),
            Err(ProviderError::MalformedResponse(_))
        ));

        let denied = ProviderResponse {
            status: 429,
            text: "quota".to_string(),
        };
        assert!(matches!(
            denied.error_for_status(),
            Err(ProviderError::ProviderUnavailable { status: Some(429), .. })
        ));
    }
}
