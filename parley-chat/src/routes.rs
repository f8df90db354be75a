//! HTTP routes.

use crate::error::ChatError;
use crate::page::CHAT_PAGE;
use crate::service::ChatService;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Page
        .route("/", get(chat_page))
        .route("/chat", get(chat_page))
        // Conversation
        .route("/send_message", post(send_message))
        .route("/clear_chat", post(clear_chat))
        // Credential
        .route("/save_api_key", post(save_api_key))
        .with_state(state)
}

// ============ Health Check ============

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mode = state.chat.context_mode();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "parley-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.chat.provider().name(),
        "context_mode": mode,
        "api_key_set": state.chat.credentials().is_set().await,
    }))
}

// ============ Page ============

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

// ============ Conversation ============

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    prompt: String,
}

async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<String, ChatError> {
    let Json(request) = payload.map_err(|e| ChatError::InvalidRequest(e.body_text()))?;

    let outcome = state.chat.send(&request.prompt).await;
    Ok(outcome.body().to_string())
}

async fn clear_chat(State(state): State<AppState>) -> &'static str {
    state.chat.clear().await;
    "Cleared"
}

// ============ Credential ============

#[derive(Debug, Deserialize)]
struct SaveApiKeyRequest {
    #[serde(default)]
    api_key: Option<String>,
}

async fn save_api_key(
    State(state): State<AppState>,
    payload: Result<Json<SaveApiKeyRequest>, JsonRejection>,
) -> Result<&'static str, ChatError> {
    let Json(request) = payload.map_err(|e| ChatError::InvalidRequest(e.body_text()))?;

    // A missing or blank key is ignored, matching the page which only posts
    // non-empty input.
    match request.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => state.chat.credentials().save(key).await?,
        _ => tracing::debug!("Empty API key submitted, nothing saved"),
    }

    Ok("API Key Saved")
}
