//! Download resolution: raw artifacts by key, and PDFs with on-demand
//! conversion from the structured JSON artifact.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::render::{render_blocking, ResumeRenderer};
use crate::storage::{media_type_for, pdf_base_name, ArtifactStore, PDF_MEDIA_TYPE};

/// A resolved artifact ready to be served.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub key: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Loads an artifact by key with its media type inferred from the suffix.
pub async fn resolve(store: &ArtifactStore, key: &str) -> Result<Artifact, AppError> {
    if !store.exists(key).await? {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    let bytes = store.get(key).await?;
    Ok(Artifact {
        key: key.to_string(),
        media_type: media_type_for(key),
        bytes,
    })
}

/// Serves the rendered PDF for `key`, converting from the JSON artifact when
/// no PDF exists yet. The converted PDF is persisted for later downloads.
pub async fn resolve_pdf(
    store: &ArtifactStore,
    renderer: Arc<dyn ResumeRenderer>,
    key: &str,
) -> Result<Artifact, AppError> {
    let base = pdf_base_name(key);
    let pdf_key = format!("{base}.pdf");
    let json_key = format!("{base}.json");

    if store.exists(&pdf_key).await? {
        let bytes = store.get(&pdf_key).await?;
        return Ok(Artifact {
            key: pdf_key,
            media_type: PDF_MEDIA_TYPE,
            bytes,
        });
    }

    if !store.exists(&json_key).await? {
        return Err(AppError::NotFound("Resume file not found".to_string()));
    }

    let raw = store.get(&json_key).await?;
    let resume: Value = serde_json::from_slice(&raw)
        .map_err(|e| AppError::RenderFailed(format!("Error generating PDF: {e}")))?;

    let bytes = render_blocking(renderer, resume)
        .await
        .map_err(|e| AppError::RenderFailed(format!("Error generating PDF: {e}")))?;
    store.put(&pdf_key, &bytes).await?;
    info!("Converted {json_key} to {pdf_key} on demand");

    Ok(Artifact {
        key: pdf_key,
        media_type: PDF_MEDIA_TYPE,
        bytes,
    })
}
