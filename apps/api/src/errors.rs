use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream credential error: {0}")]
    UpstreamCredential(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Queue full: {0}")]
    QueueFull(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The bare message without the variant prefix. This is what ends up in
    /// status records when a background run fails.
    pub fn detail(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::InvalidState(msg)
            | AppError::Validation(msg)
            | AppError::UpstreamCredential(msg)
            | AppError::Upstream(msg)
            | AppError::RenderFailed(msg)
            | AppError::QueueFull(msg) => msg.clone(),
            AppError::Io(e) => e.to_string(),
            AppError::Internal(e) => format!("{e:#}"),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api {
                status: 401 | 403,
                message,
            } => AppError::UpstreamCredential(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", msg.clone())
            }
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "INVALID_STATE", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UpstreamCredential(msg) => {
                tracing::error!("Upstream credential error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_CREDENTIAL_ERROR", msg.clone())
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_FAILURE", msg.clone())
            }
            AppError::RenderFailed(msg) => {
                tracing::error!("Render failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED", msg.clone())
            }
            AppError::QueueFull(msg) => {
                tracing::warn!("Rejected submission: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "QUEUE_FULL", msg.clone())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_variant_prefix() {
        let err = AppError::Upstream("model returned garbage".to_string());
        assert_eq!(err.to_string(), "Upstream failure: model returned garbage");
        assert_eq!(err.detail(), "model returned garbage");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::UnsupportedFormat("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidState("x".into()), StatusCode::BAD_REQUEST),
            (AppError::UpstreamCredential("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::RenderFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::QueueFull("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_llm_credential_failure_maps_to_upstream_credential() {
        let err: AppError = LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::UpstreamCredential(ref m) if m == "invalid x-api-key"));

        let err: AppError = LlmError::EmptyContent.into();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
