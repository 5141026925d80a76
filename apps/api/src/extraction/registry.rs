//! In-memory registry of uploaded resumes and their extraction status.
//!
//! Locking discipline: the map lock is held only for in-memory reads and
//! writes, never across file I/O or collaborator calls. Readers get cloned
//! snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::text::{extension_of, DocumentFormat};
use crate::models::status::JobState;
use crate::storage::ArtifactStore;

#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub resume_id: Uuid,
    pub filename: String,
    /// Key of the raw upload in the upload store: `<resume_id>_<filename>`.
    pub file_key: String,
    pub upload_time: DateTime<Utc>,
    pub status: &'static str,
}

/// Extraction progress for one resume. `extracted_data` is set iff
/// `state == Completed`; `error_message` only when `Failed`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionStatus {
    #[serde(rename = "status")]
    pub state: JobState,
    pub extracted_data: Option<Value>,
    pub error_message: Option<String>,
}

impl ExtractionStatus {
    fn pending() -> Self {
        Self {
            state: JobState::Pending,
            extracted_data: None,
            error_message: None,
        }
    }
}

/// Why a resume cannot be tailored yet. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadinessError {
    #[error("Resume not found")]
    NotFound,

    #[error("Resume not extracted yet")]
    NotExtracted,

    #[error("Resume extraction not completed")]
    ExtractionIncomplete,

    #[error("No extracted resume data available")]
    NoData,
}

impl From<ReadinessError> for AppError {
    fn from(err: ReadinessError) -> Self {
        match err {
            ReadinessError::NotFound => AppError::NotFound(err.to_string()),
            other => AppError::InvalidState(other.to_string()),
        }
    }
}

struct Entry {
    record: ResumeRecord,
    extraction: Option<ExtractionStatus>,
}

pub struct ResumeRegistry {
    uploads: ArtifactStore,
    entries: RwLock<HashMap<Uuid, Entry>>,
}

impl ResumeRegistry {
    pub fn new(uploads: ArtifactStore) -> Self {
        Self {
            uploads,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Stores an upload and creates its record with extraction `pending`.
    pub async fn register(&self, filename: &str, bytes: &[u8]) -> Result<ResumeRecord, AppError> {
        let filename = final_component(filename);
        if DocumentFormat::from_filename(filename).is_none() {
            return Err(AppError::UnsupportedFormat(format!(
                "File type {} not supported. Allowed types: {}",
                extension_of(filename),
                DocumentFormat::ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let resume_id = Uuid::new_v4();
        let file_key = format!("{resume_id}_{filename}");
        self.uploads.put(&file_key, bytes).await?;

        let record = ResumeRecord {
            resume_id,
            filename: filename.to_string(),
            file_key,
            upload_time: Utc::now(),
            status: "uploaded",
        };
        self.entries.write().await.insert(
            resume_id,
            Entry {
                record: record.clone(),
                extraction: Some(ExtractionStatus::pending()),
            },
        );

        info!(resume_id = %resume_id, filename = %record.filename, "Resume uploaded");
        Ok(record)
    }

    pub async fn record(&self, resume_id: Uuid) -> Option<ResumeRecord> {
        let entries = self.entries.read().await;
        entries.get(&resume_id).map(|e| e.record.clone())
    }

    /// Original filename and raw bytes of an upload.
    pub async fn read_upload(&self, resume_id: Uuid) -> Result<(String, Vec<u8>), AppError> {
        let record = self
            .record(resume_id)
            .await
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
        let bytes = self.uploads.get(&record.file_key).await?;
        Ok((record.filename, bytes))
    }

    pub async fn status(&self, resume_id: Uuid) -> Result<ExtractionStatus, AppError> {
        let entries = self.entries.read().await;
        entries
            .get(&resume_id)
            .and_then(|e| e.extraction.clone())
            .ok_or_else(|| AppError::NotFound("Extraction status not found".to_string()))
    }

    /// Moves a resume into `processing`. Rejects a second extraction while
    /// one is already in flight.
    pub async fn mark_processing(&self, resume_id: Uuid) -> Result<ExtractionStatus, AppError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&resume_id)
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

        let extraction = entry.extraction.get_or_insert_with(ExtractionStatus::pending);
        if extraction.state == JobState::Processing {
            return Err(AppError::InvalidState(
                "Extraction already in progress".to_string(),
            ));
        }
        *extraction = ExtractionStatus {
            state: JobState::Processing,
            extracted_data: None,
            error_message: None,
        };
        Ok(extraction.clone())
    }

    /// The single terminal write of an extraction run.
    pub async fn finish_extraction(&self, resume_id: Uuid, outcome: Result<Value, String>) {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&resume_id) else {
            return;
        };
        entry.extraction = Some(match outcome {
            Ok(data) => ExtractionStatus {
                state: JobState::Completed,
                extracted_data: Some(data),
                error_message: None,
            },
            Err(message) => ExtractionStatus {
                state: JobState::Failed,
                extracted_data: None,
                error_message: Some(message),
            },
        });
    }

    /// Replaces extracted data after manual correction. Only allowed once
    /// extraction has completed.
    pub async fn update_data(&self, resume_id: Uuid, data: Value) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        let extraction = entries
            .get_mut(&resume_id)
            .and_then(|e| e.extraction.as_mut())
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

        if extraction.state != JobState::Completed {
            return Err(AppError::InvalidState(
                "Resume extraction not complete, cannot update.".to_string(),
            ));
        }
        extraction.extracted_data = Some(data);
        Ok(())
    }

    /// Extracted data ready for tailoring, or the first failed precondition.
    pub async fn extracted_data(&self, resume_id: Uuid) -> Result<Value, ReadinessError> {
        let entries = self.entries.read().await;
        let entry = entries.get(&resume_id).ok_or(ReadinessError::NotFound)?;
        let extraction = entry.extraction.as_ref().ok_or(ReadinessError::NotExtracted)?;
        if extraction.state != JobState::Completed {
            return Err(ReadinessError::ExtractionIncomplete);
        }
        match &extraction.extracted_data {
            Some(data) if !is_empty(data) => Ok(data.clone()),
            _ => Err(ReadinessError::NoData),
        }
    }

    /// Inserts a record with no extraction entry at all.
    #[cfg(test)]
    pub(crate) async fn insert_without_status(&self, filename: &str) -> Uuid {
        let resume_id = Uuid::new_v4();
        let record = ResumeRecord {
            resume_id,
            filename: filename.to_string(),
            file_key: format!("{resume_id}_{filename}"),
            upload_time: Utc::now(),
            status: "uploaded",
        };
        self.entries.write().await.insert(
            resume_id,
            Entry {
                record,
                extraction: None,
            },
        );
        resume_id
    }
}

/// Strips any client-side directory prefix from an upload name.
fn final_component(filename: &str) -> &str {
    filename.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(filename)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn registry() -> (TempDir, ResumeRegistry) {
        let dir = TempDir::new().unwrap();
        let uploads = ArtifactStore::new(dir.path()).unwrap();
        (dir, ResumeRegistry::new(uploads))
    }

    #[tokio::test]
    async fn test_register_stores_upload_and_starts_pending() {
        let (_dir, registry) = registry();
        let record = registry.register("cv.pdf", b"%PDF-1.4").await.unwrap();

        assert_eq!(record.file_key, format!("{}_cv.pdf", record.resume_id));
        let (name, bytes) = registry.read_upload(record.resume_id).await.unwrap();
        assert_eq!(name, "cv.pdf");
        assert_eq!(bytes, b"%PDF-1.4");

        let status = registry.status(record.resume_id).await.unwrap();
        assert_eq!(status.state, JobState::Pending);
        assert!(status.extracted_data.is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_unsupported_extension() {
        let (_dir, registry) = registry();
        let err = registry.register("notes.txt", b"hello").await.unwrap_err();
        match err {
            AppError::UnsupportedFormat(msg) => {
                assert!(msg.contains(".txt"), "message should name the extension: {msg}");
                assert!(msg.contains(".docx"));
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_strips_client_directories() {
        let (_dir, registry) = registry();
        let record = registry
            .register("C:\\Users\\ada\\resume.DOCX", b"zip")
            .await
            .unwrap();
        assert_eq!(record.filename, "resume.DOCX");
    }

    #[tokio::test]
    async fn test_register_accepts_dots_inside_filename() {
        let (_dir, registry) = registry();
        for name in ["John..Doe.pdf", "resume...pdf"] {
            let record = registry.register(name, b"%PDF").await.unwrap();
            assert_eq!(record.filename, name);
            let (stored, bytes) = registry.read_upload(record.resume_id).await.unwrap();
            assert_eq!(stored, name);
            assert_eq!(bytes, b"%PDF");
        }
    }

    #[tokio::test]
    async fn test_concurrent_extraction_is_rejected() {
        let (_dir, registry) = registry();
        let id = registry.register("cv.pdf", b"x").await.unwrap().resume_id;

        registry.mark_processing(id).await.unwrap();
        let second = registry.mark_processing(id).await;
        assert!(matches!(second, Err(AppError::InvalidState(_))));

        registry.finish_extraction(id, Err("boom".into())).await;
        assert!(registry.mark_processing(id).await.is_ok(), "re-extraction after failure is allowed");
    }

    #[tokio::test]
    async fn test_update_requires_completed_extraction() {
        let (_dir, registry) = registry();
        let id = registry.register("cv.pdf", b"x").await.unwrap().resume_id;

        let early = registry.update_data(id, json!({"summary": "edited"})).await;
        assert!(matches!(early, Err(AppError::InvalidState(_))));

        registry.mark_processing(id).await.unwrap();
        registry.finish_extraction(id, Ok(json!({"summary": "parsed"}))).await;
        registry.update_data(id, json!({"summary": "edited"})).await.unwrap();

        let status = registry.status(id).await.unwrap();
        assert_eq!(status.extracted_data.unwrap()["summary"], "edited");

        let unknown = registry.update_data(Uuid::new_v4(), json!({})).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_extraction_has_no_data() {
        let (_dir, registry) = registry();
        let id = registry.register("cv.pdf", b"x").await.unwrap().resume_id;
        registry.mark_processing(id).await.unwrap();
        registry
            .finish_extraction(id, Err("Failed to extract text from resume".into()))
            .await;

        let status = registry.status(id).await.unwrap();
        assert_eq!(status.state, JobState::Failed);
        assert!(status.extracted_data.is_none());
        assert_eq!(status.error_message.as_deref(), Some("Failed to extract text from resume"));
    }

    #[tokio::test]
    async fn test_readiness_preconditions_in_order() {
        let (_dir, registry) = registry();

        assert_eq!(
            registry.extracted_data(Uuid::new_v4()).await,
            Err(ReadinessError::NotFound)
        );

        let bare = registry.insert_without_status("cv.pdf").await;
        assert_eq!(
            registry.extracted_data(bare).await,
            Err(ReadinessError::NotExtracted)
        );

        let pending = registry.register("cv.pdf", b"x").await.unwrap().resume_id;
        assert_eq!(
            registry.extracted_data(pending).await,
            Err(ReadinessError::ExtractionIncomplete)
        );

        registry.mark_processing(pending).await.unwrap();
        registry.finish_extraction(pending, Ok(json!({}))).await;
        assert_eq!(
            registry.extracted_data(pending).await,
            Err(ReadinessError::NoData)
        );

        registry
            .update_data(pending, json!({"summary": "ready"}))
            .await
            .unwrap();
        assert_eq!(
            registry.extracted_data(pending).await.unwrap()["summary"],
            "ready"
        );
    }

    #[test]
    fn test_readiness_errors_map_to_http_errors() {
        assert!(matches!(
            AppError::from(ReadinessError::NotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ReadinessError::ExtractionIncomplete),
            AppError::InvalidState(ref m) if m == "Resume extraction not completed"
        ));
    }
}
