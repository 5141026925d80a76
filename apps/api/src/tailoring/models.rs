//! Tailoring batch and subjob state.
//!
//! A batch owns one subjob per submitted job description, index-aligned with
//! the input and never reordered. Subjob transitions are forward-only
//! (`pending → processing → completed | failed`); the guarded setters below
//! ignore any write that would leave a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::{text_field, JobDescription, UNKNOWN_COMPANY, UNKNOWN_TITLE};
use crate::models::resume::TailoredResume;
use crate::models::status::JobState;

pub const PROGRESS_STARTING: &str = "Starting resume tailoring...";
pub const PROGRESS_DONE: &str = "Resume tailored successfully!";
pub const NO_CONTENT_ERROR: &str = "Failed to generate tailored content";
pub const ALL_FAILED_ERROR: &str = "All jobs failed to process";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLinks {
    pub json: String,
    pub pdf: String,
}

impl DownloadLinks {
    /// Links for a persisted artifact pair. Without a rendered PDF the `pdf`
    /// link points at on-demand conversion of the JSON artifact.
    pub fn for_artifacts(json_key: &str, pdf_key: &str, pdf_rendered: bool) -> Self {
        Self {
            json: format!("/api/download/{json_key}"),
            pdf: if pdf_rendered {
                format!("/api/download/{pdf_key}")
            } else {
                format!("/api/download/{json_key}/pdf")
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubJob {
    pub job_index: usize,
    pub job_title: String,
    pub company: String,
    pub status: JobState,
    pub progress_message: Option<String>,
    pub error_message: Option<String>,
    pub tailored_resume: Option<TailoredResume>,
    pub download_links: Option<DownloadLinks>,
}

impl SubJob {
    fn new(job_index: usize, job: &JobDescription) -> Self {
        Self {
            job_index,
            job_title: text_field(job, "title").unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            company: text_field(job, "company").unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            status: JobState::Pending,
            progress_message: None,
            error_message: None,
            tailored_resume: None,
            download_links: None,
        }
    }

    pub fn start(&mut self) -> bool {
        if !self.status.can_advance_to(JobState::Processing) {
            return false;
        }
        self.status = JobState::Processing;
        self.progress_message = Some(PROGRESS_STARTING.to_string());
        true
    }

    /// Overwrites the progress message of a running subjob.
    pub fn report(&mut self, message: &str) {
        if self.status == JobState::Processing {
            self.progress_message = Some(message.to_string());
        }
    }

    pub fn complete(&mut self, resume: TailoredResume, links: DownloadLinks) -> bool {
        if !self.status.can_advance_to(JobState::Completed) {
            return false;
        }
        self.status = JobState::Completed;
        self.progress_message = Some(PROGRESS_DONE.to_string());
        self.error_message = None;
        self.tailored_resume = Some(resume);
        self.download_links = Some(links);
        true
    }

    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.status.can_advance_to(JobState::Failed) {
            return false;
        }
        self.status = JobState::Failed;
        self.progress_message = None;
        self.error_message = Some(message.into());
        self.tailored_resume = None;
        self.download_links = None;
        true
    }
}

#[derive(Debug, Clone)]
pub struct TailoringBatch {
    pub task_id: Uuid,
    pub resume_id: Uuid,
    pub job_descriptions: Vec<JobDescription>,
    pub state: JobState,
    pub subjobs: Vec<SubJob>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TailoringBatch {
    pub fn new(task_id: Uuid, resume_id: Uuid, job_descriptions: Vec<JobDescription>) -> Self {
        let subjobs = job_descriptions
            .iter()
            .enumerate()
            .map(|(index, job)| SubJob::new(index, job))
            .collect();
        Self {
            task_id,
            resume_id,
            job_descriptions,
            state: JobState::Pending,
            subjobs,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn start(&mut self) {
        if self.state == JobState::Pending {
            self.state = JobState::Processing;
        }
    }

    /// (completed, failed), recomputed from the subjobs.
    pub fn counts(&self) -> (usize, usize) {
        self.subjobs.iter().fold((0, 0), |(done, failed), job| match job.status {
            JobState::Completed => (done + 1, failed),
            JobState::Failed => (done, failed + 1),
            _ => (done, failed),
        })
    }

    /// Settles the overall state once every subjob is terminal: `completed`
    /// if any subjob succeeded, otherwise `failed`.
    pub fn finalize(&mut self) {
        if self.state.is_terminal() || self.subjobs.iter().any(|j| !j.status.is_terminal()) {
            return;
        }
        let (completed, failed) = self.counts();
        let total = self.subjobs.len();

        if completed > 0 {
            self.state = JobState::Completed;
            if completed < total {
                self.error_message = Some(format!(
                    "{completed} out of {total} jobs completed successfully. {failed} jobs failed."
                ));
            }
        } else {
            self.state = JobState::Failed;
            self.error_message = Some(ALL_FAILED_ERROR.to_string());
        }
    }

    /// Fails the whole batch. Subjobs that never finished are failed with the
    /// same message so no subjob outlives a terminal batch.
    pub fn abort(&mut self, message: &str) {
        if self.state.is_terminal() {
            return;
        }
        for job in &mut self.subjobs {
            job.fail(message);
        }
        self.state = JobState::Failed;
        self.error_message = Some(message.to_string());
    }

    pub fn status(&self) -> TailorStatusResponse {
        let (completed_jobs, failed_jobs) = self.counts();
        TailorStatusResponse {
            task_id: self.task_id,
            overall_status: self.state,
            total_jobs: self.subjobs.len(),
            completed_jobs,
            failed_jobs,
            individual_jobs: self.subjobs.clone(),
            error_message: self.error_message.clone(),
            created_at: self.created_at,
        }
    }
}

/// Point-in-time projection served by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TailorStatusResponse {
    pub task_id: Uuid,
    pub overall_status: JobState,
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub failed_jobs: usize,
    pub individual_jobs: Vec<SubJob>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
