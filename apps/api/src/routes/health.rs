use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

const SERVICE_NAME: &str = "ResumeTailor API";

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
/// Service info and a map of the public endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "validate_key": "/api/validate-key",
            "search_jobs": "/api/search",
            "upload_resume": "/api/upload",
            "extract_resume": "/api/extract/{resume_id}",
            "extraction_status": "/api/extract/{resume_id}/status",
            "update_resume": "/api/resume/{resume_id}",
            "tailor_resume": "/api/tailor",
            "tailoring_status": "/api/tailor/{task_id}/status",
            "download": "/api/download/{file_key}",
            "download_pdf": "/api/download/{file_key}/pdf",
        }
    }))
}

/// GET /api/validate-key
/// Probes the LLM credentials. Always answers 200; failures are reported in the body.
pub async fn validate_key_handler(State(state): State<AppState>) -> Json<Value> {
    let result = state.llm.validate_key().await;
    Json(json!({
        "valid": result.valid,
        "error_message": result.error,
        "timestamp": Utc::now(),
    }))
}
