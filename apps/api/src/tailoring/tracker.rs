//! Tailoring job tracker.
//!
//! `submit` validates the resume, creates a batch with one pending subjob per
//! job description and queues it. A worker then runs the batch: subjobs are
//! processed strictly in index order, each one failing or completing on its
//! own, and the batch is settled once all of them are terminal.
//!
//! The batch map lock is only held for in-memory reads and writes. Tailoring,
//! rendering and file I/O happen with no lock held, so status polling never
//! waits on a collaborator.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::registry::ResumeRegistry;
use crate::models::job::{JobContext, JobDescription};
use crate::models::resume::TailoredResume;
use crate::render::{render_blocking, ResumeRenderer};
use crate::storage::ArtifactStore;
use crate::tailoring::models::{
    DownloadLinks, TailorStatusResponse, TailoringBatch, NO_CONTENT_ERROR,
};
use crate::tailoring::naming::artifact_base_name;
use crate::tailoring::tailor::ResumeTailor;
use crate::workers::{join_failure_message, QueueConfig, WorkQueue};

const PANIC_ERROR: &str = "Batch processing panicked";

/// A queued batch run. The resume data is the snapshot taken at submission.
pub struct BatchJob {
    pub task_id: Uuid,
    pub resume_id: Uuid,
    pub resume: Value,
}

#[derive(Default)]
pub struct BatchStore {
    batches: RwLock<HashMap<Uuid, TailoringBatch>>,
}

impl BatchStore {
    pub async fn insert(&self, batch: TailoringBatch) {
        self.batches.write().await.insert(batch.task_id, batch);
    }

    pub async fn status(&self, task_id: Uuid) -> Option<TailorStatusResponse> {
        self.batches.read().await.get(&task_id).map(TailoringBatch::status)
    }

    pub async fn job_descriptions(&self, task_id: Uuid) -> Option<Vec<JobDescription>> {
        let batches = self.batches.read().await;
        batches.get(&task_id).map(|b| b.job_descriptions.clone())
    }

    /// Applies `f` to a batch under the write lock.
    pub async fn update<R>(&self, task_id: Uuid, f: impl FnOnce(&mut TailoringBatch) -> R) -> Option<R> {
        self.batches.write().await.get_mut(&task_id).map(f)
    }
}

pub struct TailoringTracker {
    registry: Arc<ResumeRegistry>,
    batches: Arc<BatchStore>,
    queue: WorkQueue<BatchJob>,
}

impl TailoringTracker {
    /// Starts the tailoring workers.
    pub fn start(
        registry: Arc<ResumeRegistry>,
        batches: Arc<BatchStore>,
        runner: Arc<BatchRunner>,
        config: QueueConfig,
    ) -> Self {
        let queue = WorkQueue::start("tailoring", config, move |job: BatchJob| {
            let runner = runner.clone();
            async move { runner.run(job).await }
        });
        Self {
            registry,
            batches,
            queue,
        }
    }

    /// Creates a batch for `resume_id` and queues it. Returns the task id
    /// without waiting for any subjob.
    pub async fn submit(
        &self,
        resume_id: Uuid,
        job_descriptions: Vec<JobDescription>,
    ) -> Result<Uuid, AppError> {
        let resume = self.registry.extracted_data(resume_id).await?;
        let permit = self.queue.try_reserve()?;

        let task_id = Uuid::new_v4();
        let total = job_descriptions.len();
        self.batches
            .insert(TailoringBatch::new(task_id, resume_id, job_descriptions))
            .await;
        permit.send(BatchJob {
            task_id,
            resume_id,
            resume,
        });

        info!(task_id = %task_id, resume_id = %resume_id, total, "Tailoring batch queued");
        Ok(task_id)
    }

    pub async fn status(&self, task_id: Uuid) -> Result<TailorStatusResponse, AppError> {
        self.batches
            .status(task_id)
            .await
            .ok_or_else(|| AppError::NotFound("Tailoring task not found".to_string()))
    }
}

pub struct BatchRunner {
    batches: Arc<BatchStore>,
    artifacts: ArtifactStore,
    tailor: Arc<dyn ResumeTailor>,
    renderer: Arc<dyn ResumeRenderer>,
}

impl BatchRunner {
    pub fn new(
        batches: Arc<BatchStore>,
        artifacts: ArtifactStore,
        tailor: Arc<dyn ResumeTailor>,
        renderer: Arc<dyn ResumeRenderer>,
    ) -> Self {
        Self {
            batches,
            artifacts,
            tailor,
            renderer,
        }
    }

    /// Runs one batch to a terminal state. Failures escaping the subjob loop,
    /// including panics, fail the whole batch.
    pub async fn run(self: Arc<Self>, job: BatchJob) {
        let task_id = job.task_id;
        let runner = self.clone();
        let failure = match tokio::spawn(async move { runner.process(job).await }).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                error!(task_id = %task_id, "Tailoring batch failed: {e}");
                Some(e.detail())
            }
            Err(e) => {
                error!(task_id = %task_id, "Tailoring batch aborted: {e}");
                Some(join_failure_message(e, PANIC_ERROR))
            }
        };
        if let Some(message) = failure {
            self.batches.update(task_id, |b| b.abort(&message)).await;
        }
    }

    async fn process(&self, job: BatchJob) -> Result<(), AppError> {
        let BatchJob {
            task_id,
            resume_id,
            resume,
        } = job;
        let missing = || AppError::NotFound(format!("Tailoring task {task_id} not found"));

        self.batches.update(task_id, TailoringBatch::start).await.ok_or_else(missing)?;
        let descriptions = self.batches.job_descriptions(task_id).await.ok_or_else(missing)?;

        for (index, description) in descriptions.iter().enumerate() {
            self.process_subjob(task_id, resume_id, &resume, index, description)
                .await;
        }

        let status = self
            .batches
            .update(task_id, |b| {
                b.finalize();
                b.status()
            })
            .await
            .ok_or_else(missing)?;
        info!(
            task_id = %task_id,
            status = %status.overall_status,
            completed = status.completed_jobs,
            failed = status.failed_jobs,
            "Tailoring batch finished"
        );
        Ok(())
    }

    /// Drives one subjob to a terminal state. Never returns an error: every
    /// failure is recorded on the subjob itself.
    async fn process_subjob(
        &self,
        task_id: Uuid,
        resume_id: Uuid,
        resume: &Value,
        index: usize,
        description: &JobDescription,
    ) {
        self.batches
            .update(task_id, |b| b.subjobs[index].start())
            .await;

        let context = JobContext::from_description(description);
        self.report(task_id, index, "Tailoring resume with AI...").await;

        let outcome = match self.tailor.tailor(resume, &context).await {
            Ok(Some(tailored)) => {
                let persisted = self
                    .persist(task_id, resume_id, index, description, &tailored)
                    .await;
                persisted.map(|links| (tailored, links)).map_err(|e| e.detail())
            }
            Ok(None) => Err(NO_CONTENT_ERROR.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok((tailored, links)) => {
                self.batches
                    .update(task_id, |b| b.subjobs[index].complete(tailored, links))
                    .await;
                info!(task_id = %task_id, job_index = index, "Subjob completed");
            }
            Err(message) => {
                warn!(task_id = %task_id, job_index = index, "Subjob failed: {message}");
                self.batches
                    .update(task_id, |b| b.subjobs[index].fail(message))
                    .await;
            }
        }
    }

    /// Writes the JSON artifact, attempts the PDF, and returns download links.
    /// A render failure only downgrades the `pdf` link to on-demand conversion.
    async fn persist(
        &self,
        task_id: Uuid,
        resume_id: Uuid,
        index: usize,
        description: &JobDescription,
        tailored: &TailoredResume,
    ) -> Result<DownloadLinks, AppError> {
        self.report(task_id, index, "Converting to dictionary format...").await;
        let value = serde_json::to_value(tailored)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize tailored resume: {e}")))?;

        self.report(task_id, index, "Generating filenames...").await;
        let base = artifact_base_name(resume_id, description, index);
        let json_key = format!("{base}.json");
        let pdf_key = format!("{base}.pdf");

        self.report(task_id, index, "Saving JSON file...").await;
        self.artifacts.put_json(&json_key, &value).await?;

        self.report(task_id, index, "Generating PDF...").await;
        let pdf_rendered = match render_blocking(self.renderer.clone(), value).await {
            Ok(bytes) => match self.artifacts.put(&pdf_key, &bytes).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(task_id = %task_id, job_index = index, "Failed to store PDF: {e}");
                    false
                }
            },
            Err(e) => {
                warn!(task_id = %task_id, job_index = index, "PDF generation failed: {e}");
                false
            }
        };

        self.report(task_id, index, "Creating download links...").await;
        Ok(DownloadLinks::for_artifacts(&json_key, &pdf_key, pdf_rendered))
    }

    async fn report(&self, task_id: Uuid, index: usize, message: &str) {
        self.batches
            .update(task_id, |b| b.subjobs[index].report(message))
            .await;
    }
}
