//! Extraction orchestration: one queued run per `begin_extraction` call.
//!
//! A run reads the upload, extracts its text on the blocking pool, sends the
//! text to the resume parser and writes the outcome to the registry exactly
//! once.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::parser::ResumeParser;
use crate::extraction::registry::{ExtractionStatus, ResumeRegistry};
use crate::extraction::text::{DocumentTextExtractor, TextExtractionError};
use crate::llm_client::LlmError;
use crate::workers::{join_failure_message, QueueConfig, WorkQueue};

const PANIC_ERROR: &str = "Extraction processing panicked";
const NO_DATA_ERROR: &str = "Failed to extract resume data";

pub struct ExtractionOrchestrator {
    registry: Arc<ResumeRegistry>,
    queue: WorkQueue<Uuid>,
}

impl ExtractionOrchestrator {
    /// Starts the extraction workers.
    pub fn start(registry: Arc<ResumeRegistry>, runner: Arc<ExtractionRunner>, config: QueueConfig) -> Self {
        let queue = WorkQueue::start("extraction", config, move |resume_id: Uuid| {
            let runner = runner.clone();
            async move { runner.run(resume_id).await }
        });
        Self { registry, queue }
    }

    /// Marks the resume `processing` and queues one extraction run. Returns
    /// without waiting for the run.
    pub async fn begin_extraction(&self, resume_id: Uuid) -> Result<ExtractionStatus, AppError> {
        if self.registry.record(resume_id).await.is_none() {
            return Err(AppError::NotFound("Resume not found".to_string()));
        }
        let permit = self.queue.try_reserve()?;
        let status = self.registry.mark_processing(resume_id).await?;
        permit.send(resume_id);
        info!(resume_id = %resume_id, "Extraction queued");
        Ok(status)
    }
}

pub struct ExtractionRunner {
    registry: Arc<ResumeRegistry>,
    text_extractor: Arc<dyn DocumentTextExtractor>,
    parser: Arc<dyn ResumeParser>,
}

impl ExtractionRunner {
    pub fn new(
        registry: Arc<ResumeRegistry>,
        text_extractor: Arc<dyn DocumentTextExtractor>,
        parser: Arc<dyn ResumeParser>,
    ) -> Self {
        Self {
            registry,
            text_extractor,
            parser,
        }
    }

    pub async fn run(self: Arc<Self>, resume_id: Uuid) {
        let runner = self.clone();
        let outcome = match tokio::spawn(async move { runner.extract(resume_id).await }).await {
            Ok(Ok(data)) => {
                info!(resume_id = %resume_id, "Extraction completed");
                Ok(data)
            }
            Ok(Err(e)) => {
                warn!(resume_id = %resume_id, "Extraction failed: {e}");
                Err(failure_message(&e))
            }
            Err(e) => {
                error!(resume_id = %resume_id, "Extraction task aborted: {e}");
                Err(join_failure_message(e, PANIC_ERROR))
            }
        };
        self.registry.finish_extraction(resume_id, outcome).await;
    }

    async fn extract(&self, resume_id: Uuid) -> Result<Value, AppError> {
        let (filename, bytes) = self.registry.read_upload(resume_id).await?;

        let extractor = self.text_extractor.clone();
        let text = tokio::task::spawn_blocking(move || extractor.extract(&filename, &bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("text extraction task failed: {e}")))?
            .map_err(|e| match e {
                TextExtractionError::UnsupportedFormat(_) => AppError::UnsupportedFormat(e.to_string()),
                other => AppError::Upstream(other.to_string()),
            })?;

        let data = self.parser.parse(&text).await.map_err(|e| match e {
            LlmError::Unparseable => AppError::Upstream(NO_DATA_ERROR.to_string()),
            other => other.into(),
        })?;
        if data.as_object().is_some_and(|fields| !fields.is_empty()) {
            Ok(data)
        } else {
            Err(AppError::Upstream(NO_DATA_ERROR.to_string()))
        }
    }
}

/// Message recorded on a failed extraction.
fn failure_message(err: &AppError) -> String {
    match err {
        AppError::UpstreamCredential(detail) => format!("API Key Error: {detail}"),
        other => other.detail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::text::{docx_fixture, DefaultTextExtractor};
    use crate::models::status::JobState;
    use crate::storage::ArtifactStore;
    use crate::test_support::{wait_for, FakeParser};
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use tokio::sync::{Notify, Semaphore};

    /// Parser that signals entry and then never returns.
    struct StuckParser {
        entered: Notify,
        gate: Semaphore,
    }

    impl Default for StuckParser {
        fn default() -> Self {
            Self {
                entered: Notify::new(),
                gate: Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl ResumeParser for StuckParser {
        async fn parse(&self, _resume_text: &str) -> Result<Value, LlmError> {
            self.entered.notify_one();
            let _permit = self.gate.acquire().await;
            Err(LlmError::Unparseable)
        }
    }

    fn orchestrator(dir: &TempDir, parser: FakeParser) -> (Arc<ResumeRegistry>, ExtractionOrchestrator) {
        let registry = Arc::new(ResumeRegistry::new(ArtifactStore::new(dir.path()).unwrap()));
        let runner = Arc::new(ExtractionRunner::new(
            registry.clone(),
            Arc::new(DefaultTextExtractor),
            Arc::new(parser),
        ));
        let orchestrator = ExtractionOrchestrator::start(
            registry.clone(),
            runner,
            QueueConfig {
                workers: 1,
                capacity: 4,
            },
        );
        (registry, orchestrator)
    }

    async fn settled(registry: &ResumeRegistry, id: Uuid) -> ExtractionStatus {
        wait_for(|| async move { registry.status(id).await.ok().filter(|s| s.state.is_terminal()) }).await
    }

    #[tokio::test]
    async fn test_docx_upload_extracts_to_completed() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) =
            orchestrator(&dir, FakeParser(|| Ok(json!({"contact_info": {"name": "Ada"}}))));
        let id = registry
            .register("cv.docx", &docx_fixture(&["Ada Lovelace"]))
            .await
            .unwrap()
            .resume_id;

        let queued = orchestrator.begin_extraction(id).await.unwrap();
        assert_eq!(queued.state, JobState::Processing);

        let status = settled(&registry, id).await;
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(status.extracted_data.unwrap()["contact_info"]["name"], "Ada");
        assert!(status.error_message.is_none());
    }

    #[tokio::test]
    async fn test_credential_failure_is_prefixed() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) = orchestrator(
            &dir,
            FakeParser(|| {
                Err(LlmError::Api {
                    status: 401,
                    message: "invalid x-api-key".to_string(),
                })
            }),
        );
        let id = registry
            .register("cv.docx", &docx_fixture(&["Ada"]))
            .await
            .unwrap()
            .resume_id;

        orchestrator.begin_extraction(id).await.unwrap();
        let status = settled(&registry, id).await;
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(status.error_message.as_deref(), Some("API Key Error: invalid x-api-key"));
        assert!(status.extracted_data.is_none());
    }

    #[tokio::test]
    async fn test_empty_document_fails_with_raw_message() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) = orchestrator(&dir, FakeParser(|| Ok(json!({"summary": "x"}))));
        let id = registry
            .register("cv.docx", &docx_fixture(&[""]))
            .await
            .unwrap()
            .resume_id;

        orchestrator.begin_extraction(id).await.unwrap();
        let status = settled(&registry, id).await;
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(
            status.error_message.as_deref(),
            Some("Failed to extract text from resume")
        );
    }

    #[tokio::test]
    async fn test_unparseable_model_output() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) = orchestrator(&dir, FakeParser(|| Err(LlmError::Unparseable)));
        let id = registry
            .register("cv.docx", &docx_fixture(&["Ada"]))
            .await
            .unwrap()
            .resume_id;

        orchestrator.begin_extraction(id).await.unwrap();
        let status = settled(&registry, id).await;
        assert_eq!(status.error_message.as_deref(), Some("Failed to extract resume data"));
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (_registry, orchestrator) = orchestrator(&dir, FakeParser(|| Ok(json!({}))));
        let result = orchestrator.begin_extraction(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_parse_result_fails() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) = orchestrator(&dir, FakeParser(|| Ok(json!({}))));
        let id = registry
            .register("cv.docx", &docx_fixture(&["Ada"]))
            .await
            .unwrap()
            .resume_id;

        orchestrator.begin_extraction(id).await.unwrap();
        let status = settled(&registry, id).await;
        assert_eq!(status.state, JobState::Failed, "an empty object is not a resume");
        assert_eq!(status.error_message.as_deref(), Some("Failed to extract resume data"));
        assert!(status.extracted_data.is_none());
    }

    #[tokio::test]
    async fn test_parser_panic_records_panic_text() {
        let dir = TempDir::new().unwrap();
        let (registry, orchestrator) = orchestrator(&dir, FakeParser(|| panic!("parser crashed")));
        let id = registry
            .register("cv.docx", &docx_fixture(&["Ada"]))
            .await
            .unwrap()
            .resume_id;

        orchestrator.begin_extraction(id).await.unwrap();
        let status = settled(&registry, id).await;
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(status.error_message.as_deref(), Some("parser crashed"));
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found_even_when_queue_is_full() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(ResumeRegistry::new(ArtifactStore::new(dir.path()).unwrap()));
        let parser = Arc::new(StuckParser::default());
        let runner = Arc::new(ExtractionRunner::new(
            registry.clone(),
            Arc::new(DefaultTextExtractor),
            parser.clone(),
        ));
        let orchestrator = ExtractionOrchestrator::start(
            registry.clone(),
            runner,
            QueueConfig {
                workers: 1,
                capacity: 1,
            },
        );

        let mut ids = Vec::new();
        for _ in 0..3 {
            let record = registry.register("cv.docx", &docx_fixture(&["Ada"])).await.unwrap();
            ids.push(record.resume_id);
        }

        orchestrator.begin_extraction(ids[0]).await.unwrap();
        parser.entered.notified().await;
        orchestrator.begin_extraction(ids[1]).await.unwrap();

        let unknown = orchestrator.begin_extraction(Uuid::new_v4()).await;
        assert!(
            matches!(unknown, Err(AppError::NotFound(_))),
            "existence is checked before capacity"
        );
        let rejected = orchestrator.begin_extraction(ids[2]).await;
        assert!(matches!(rejected, Err(AppError::QueueFull(_))));
        assert_eq!(registry.status(ids[2]).await.unwrap().state, JobState::Pending);
    }
}
