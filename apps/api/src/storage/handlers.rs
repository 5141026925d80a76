use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::download::{resolve, resolve_pdf, Artifact};

/// GET /api/download/:file_key
pub async fn handle_download(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
) -> Result<Response, AppError> {
    let artifact = resolve(&state.artifacts, &file_key).await?;
    Ok(into_attachment(artifact))
}

/// GET /api/download/:file_key/pdf
///
/// Serves the rendered PDF, converting from the JSON artifact if needed.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(file_key): Path<String>,
) -> Result<Response, AppError> {
    let artifact = resolve_pdf(&state.artifacts, state.renderer.clone(), &file_key).await?;
    Ok(into_attachment(artifact))
}

fn into_attachment(artifact: Artifact) -> Response {
    // Header values must be visible ASCII.
    let filename: String = artifact
        .key
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"')
        .collect();
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        [
            (header::CONTENT_TYPE, artifact.media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
