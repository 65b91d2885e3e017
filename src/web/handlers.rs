//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::config::ServerMode;
use crate::results::NormalizedResult;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::info;

/// Default text in the index form
const DEFAULT_QUERY: &str = "apa itu sisa kuota?";

/// Body of `POST /search`
#[derive(Debug, Deserialize)]
pub struct QueryInput {
    /// The query or follow-up question
    pub message: String,
    /// Dialogue to continue (conversation mode only)
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reply of a conversation turn
#[derive(Debug, Serialize)]
pub struct ConverseReply {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<NormalizedResult>,
}

impl ConverseReply {
    fn goodbye() -> Self {
        Self {
            message: "Goodbye!",
            session_id: None,
            reply: None,
            results: vec![],
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let mut ctx = Context::new();
    ctx.insert("mode", &state.mode());
    ctx.insert("default_query", DEFAULT_QUERY);

    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Search handler, dispatching on the configured mode
pub async fn search(
    State(state): State<AppState>,
    Json(input): Json<QueryInput>,
) -> Result<Response, ApiError> {
    match state.mode() {
        ServerMode::Search => single_shot(&state, input).await,
        ServerMode::Conversation => converse(&state, input).await,
    }
}

async fn single_shot(state: &AppState, input: QueryInput) -> Result<Response, ApiError> {
    let query = input.message.trim();
    if query.is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    let outcome = state.search.execute(query).await?;
    Ok(Json(outcome).into_response())
}

async fn converse(state: &AppState, input: QueryInput) -> Result<Response, ApiError> {
    if state.sentinel.matches(&input.message) {
        if let Some(ref id) = input.session_id {
            state.sessions.close(id).await;
        }
        return Ok(Json(ConverseReply::goodbye()).into_response());
    }

    let query = input.message.trim();
    if query.is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    let (id, session, opened) = match input.session_id {
        Some(id) => match state.sessions.get(&id).await {
            Some(session) => (id, session, false),
            None => return Err(ApiError::UnknownSession(id)),
        },
        None => {
            let (id, session) = state.sessions.open().await?;
            (id, session, true)
        }
    };

    let result = session.lock().await.converse(query).await;
    let turn = match result {
        Ok(turn) => turn,
        Err(e) => {
            // The client never learns the id of a dialogue whose first turn failed
            if opened {
                state.sessions.close(&id).await;
            }
            return Err(e.into());
        }
    };
    info!(
        "Dialogue {}: '{}' answered with {} grounding results",
        id,
        turn.query,
        turn.results.len()
    );

    Ok(Json(ConverseReply {
        message: "Question received and processed.",
        session_id: Some(id),
        reply: Some(turn.reply),
        results: turn.results,
    })
    .into_response())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
