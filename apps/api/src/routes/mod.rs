pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::scraper::handlers as scraper;
use crate::state::AppState;
use crate::storage::handlers as storage;
use crate::tailoring::handlers as tailoring;

/// Uploads larger than this are rejected before reaching the handler.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Parses a path or body id. Malformed ids can never name a record, so they
/// surface as the caller's not-found message.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/validate-key", get(health::validate_key_handler))
        // Job search
        .route("/api/search", get(scraper::handle_search))
        // Upload and extraction
        .route("/api/upload", post(extraction::handle_upload))
        .route("/api/extract/:resume_id", post(extraction::handle_begin_extraction))
        .route(
            "/api/extract/:resume_id/status",
            get(extraction::handle_extraction_status),
        )
        .route("/api/resume/:resume_id", put(extraction::handle_update_resume))
        // Tailoring
        .route("/api/tailor", post(tailoring::handle_tailor))
        .route("/api/tailor/:task_id/status", get(tailoring::handle_tailor_status))
        // Artifacts
        .route("/api/download/:file_key", get(storage::handle_download))
        .route("/api/download/:file_key/pdf", get(storage::handle_download_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
