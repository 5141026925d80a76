//! File-backed artifact storage.
//!
//! Every artifact lives directly under the store root and is addressed by a
//! single-component key. Keys are deterministic (`<resume_id>_<filename>` for
//! uploads, `<resume_id>_<company>_<title>_<index>.{json,pdf}` for tailored
//! output) so writes never collide.

pub mod download;
pub mod handlers;

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const BINARY_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolves a key to its on-disk path. Keys that would escape the root are rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        if !is_valid_key(key) {
            return Err(AppError::NotFound(format!("Invalid file key '{key}'")));
        }
        Ok(self.root.join(key))
    }

    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored artifact {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Persists a structured record as pretty-printed JSON.
    pub async fn put_json(&self, key: &str, value: &Value) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {key}: {e}")))?;
        self.put(key, &bytes).await
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".to_string()))
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains('/')
        && !key.contains('\\')
        && !key.contains('\0')
}

/// Media type inferred from the key's suffix.
pub fn media_type_for(key: &str) -> &'static str {
    if key.ends_with(".pdf") {
        PDF_MEDIA_TYPE
    } else if key.ends_with(".json") {
        JSON_MEDIA_TYPE
    } else {
        BINARY_MEDIA_TYPE
    }
}

/// Strips a trailing `.json` or `.pdf` suffix.
pub fn pdf_base_name(key: &str) -> &str {
    key.strip_suffix(".json")
        .or_else(|| key.strip_suffix(".pdf"))
        .unwrap_or(key)
}
