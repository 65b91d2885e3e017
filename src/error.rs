//! Error types for provider-facing operations

use std::time::Duration;
use thiserror::Error;

/// Failure of a call against the search provider, or of the session contract around it
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport, auth or quota failure reaching the provider
    #[error("provider unavailable{}: {message}", status_suffix(.status))]
    ProviderUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// Malformed project/location/data store identifiers, or a request the provider rejected
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The provider answered with an envelope that could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A conversation turn was attempted before the session was created
    #[error("conversation session is not active")]
    SessionNotActive,

    /// The provider did not answer within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status from the provider to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_error_message(body);
        match status {
            400 | 404 => Self::InvalidConfiguration(format!("HTTP {}: {}", status, message)),
            _ => Self::ProviderUnavailable {
                status: Some(status),
                message,
            },
        }
    }

    /// Whether a bounded retry may help
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::ProviderUnavailable { status: None, .. } => true,
            Self::ProviderUnavailable {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Pull `error.message` out of a Google API error body, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}
