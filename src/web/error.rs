//! HTTP error responses

use crate::error::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Failure of a request, rendered as `{"detail": "..."}`
#[derive(Debug)]
pub enum ApiError {
    /// The query was empty or whitespace
    EmptyQuery,
    /// No live dialogue with this id
    UnknownSession(String),
    /// The provider call failed
    Provider(ProviderError),
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyQuery => StatusCode::BAD_REQUEST,
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
            Self::Provider(e) => match e {
                ProviderError::ProviderUnavailable { .. } | ProviderError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                ProviderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ProviderError::InvalidConfiguration(_) | ProviderError::SessionNotActive => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::EmptyQuery => "query must not be empty".to_string(),
            Self::UnknownSession(id) => format!("unknown or expired session: {}", id),
            Self::Provider(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = format!("An error occurred: {}", self.message());
        if status.is_server_error() {
            tracing::error!("{}", detail);
        } else {
            tracing::debug!("{}", detail);
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
