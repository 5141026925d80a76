use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::registry::ExtractionStatus;
use crate::routes::parse_id;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ExtractionStatusResponse {
    pub resume_id: Uuid,
    #[serde(flatten)]
    pub status: ExtractionStatus,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /api/upload
///
/// Multipart form with a single `file` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let record = state.resumes.register(&filename, &bytes).await?;
        return Ok(Json(UploadResponse {
            resume_id: record.resume_id,
            filename: record.filename,
            message: "Resume uploaded successfully",
        }));
    }
    Err(AppError::Validation("Missing 'file' field".to_string()))
}

/// POST /api/extract/:resume_id
pub async fn handle_begin_extraction(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Json<ExtractionStatusResponse>, AppError> {
    let resume_id = parse_id(&resume_id, "Resume not found")?;
    let status = state.extraction.begin_extraction(resume_id).await?;
    Ok(Json(ExtractionStatusResponse { resume_id, status }))
}

/// GET /api/extract/:resume_id/status
pub async fn handle_extraction_status(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Json<ExtractionStatusResponse>, AppError> {
    let resume_id = parse_id(&resume_id, "Extraction status not found")?;
    let status = state.resumes.status(resume_id).await?;
    Ok(Json(ExtractionStatusResponse { resume_id, status }))
}

/// PUT /api/resume/:resume_id
///
/// Replaces the extracted data after manual correction.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    Json(data): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>, AppError> {
    let resume_id = parse_id(&resume_id, "Resume not found")?;
    state
        .resumes
        .update_data(resume_id, Value::Object(data))
        .await?;
    Ok(Json(MessageResponse {
        message: "Resume data updated successfully",
    }))
}
