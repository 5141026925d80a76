use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::models::status::JobState;
use crate::routes::parse_id;
use crate::state::AppState;
use crate::tailoring::models::TailorStatusResponse;

#[derive(Deserialize)]
pub struct TailorRequest {
    pub resume_id: String,
    pub job_descriptions: Vec<JobDescription>,
}

#[derive(Serialize)]
pub struct TailorResponse {
    pub task_id: Uuid,
    pub message: &'static str,
    pub status: JobState,
}

/// POST /api/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let resume_id = parse_id(&req.resume_id, "Resume not found")?;
    let task_id = state
        .tailoring
        .submit(resume_id, req.job_descriptions)
        .await?;
    Ok(Json(TailorResponse {
        task_id,
        message: "Resume tailoring started",
        status: JobState::Processing,
    }))
}

/// GET /api/tailor/:task_id/status
pub async fn handle_tailor_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TailorStatusResponse>, AppError> {
    let task_id = parse_id(&task_id, "Tailoring task not found")?;
    Ok(Json(state.tailoring.status(task_id).await?))
}
