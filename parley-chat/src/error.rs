//! Error types for parley-chat.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Chat service errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Tokenizer unavailable: {0}")]
    Tokenizer(String),

    #[error(transparent)]
    Common(#[from] parley_common::Error),
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ChatError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ChatError::Common(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let code = match status {
                    StatusCode::BAD_REQUEST => "INVALID_REQUEST",
                    StatusCode::UNAUTHORIZED => "CREDENTIAL_ERROR",
                    _ => "INTERNAL_ERROR",
                };
                (status, code)
            }
            ChatError::Tokenizer(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = serde_json::json!({
            "success": false,
            "error": ApiError {
                code: code.to_string(),
                message: self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
