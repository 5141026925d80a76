//! Tailoring collaborator: one LLM call per (resume, job) pair.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::models::job::JobContext;
use crate::models::resume::TailoredResume;
use crate::tailoring::prompts::{build_tailor_prompt, tailor_system_prompt};

/// Rewrites a resume for one job. `Ok(None)` means the call succeeded but
/// produced no usable resume.
#[async_trait]
pub trait ResumeTailor: Send + Sync {
    async fn tailor(
        &self,
        resume: &Value,
        job: &JobContext,
    ) -> Result<Option<TailoredResume>, LlmError>;
}

pub struct LlmResumeTailor {
    llm: LlmClient,
    system: String,
}

impl LlmResumeTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: tailor_system_prompt(),
        }
    }
}

#[async_trait]
impl ResumeTailor for LlmResumeTailor {
    async fn tailor(
        &self,
        resume: &Value,
        job: &JobContext,
    ) -> Result<Option<TailoredResume>, LlmError> {
        let resume_json = serde_json::to_string_pretty(resume)?;
        let prompt = build_tailor_prompt(&resume_json, job);

        let raw: Value = self.llm.call_json(&prompt, &self.system).await?;
        debug!(title = %job.title, company = %job.company, "Tailoring response received");
        Ok(validate_tailored(raw))
    }
}

/// Checks the model output against the tailored resume schema.
pub fn validate_tailored(raw: Value) -> Option<TailoredResume> {
    match serde_json::from_value::<TailoredResume>(raw) {
        Ok(resume) => Some(resume),
        Err(e) => {
            warn!("Tailored resume failed validation: {e}");
            None
        }
    }
}
