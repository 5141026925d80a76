//! In-process fakes for the external collaborators, shared by unit tests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::extraction::parser::ResumeParser;
use crate::extraction::text::DefaultTextExtractor;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::job::JobContext;
use crate::models::resume::TailoredResume;
use crate::render::{RenderError, ResumeRenderer};
use crate::scraper::{JobScraper, JobSearchQuery, ScraperError};
use crate::state::{AppState, Collaborators};
use crate::tailoring::tailor::ResumeTailor;

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls `probe` until it yields a value. Panics after five seconds.
pub async fn wait_for<T, F, Fut>(mut probe: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    loop {
        if let Some(value) = probe().await {
            return value;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not reached within {WAIT_TIMEOUT:?}");
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

pub fn sample_tailored_resume() -> TailoredResume {
    serde_json::from_value(json!({
        "contact_info": {"name": "Ada Lovelace", "email": "ada@example.com"},
        "summary": "Backend engineer building reliable Rust services.",
        "skills": {"programming_languages": ["Rust", "Python"], "databases": ["PostgreSQL"]},
        "work_experience": [{
            "company": "Analytical Engines",
            "title": "Engineer",
            "start_date": "2021-03",
            "end_date": "Present",
            "description": ["Built the ingestion pipeline", "Cut p99 latency by 40%"]
        }],
        "education": [{
            "institution": "University of London",
            "degree": "BSc",
            "major": "Mathematics",
            "graduation_date": "2019-06"
        }],
        "projects": [{
            "title": "difference-engine",
            "description": ["Polynomial tabulator"],
            "technologies_used": ["Rust"]
        }]
    }))
    .expect("sample resume matches the schema")
}

pub struct StubRenderer;

impl ResumeRenderer for StubRenderer {
    fn render(&self, _resume: &Value) -> Result<Vec<u8>, RenderError> {
        Ok(b"%PDF-stub".to_vec())
    }
}

pub struct FailingRenderer;

impl ResumeRenderer for FailingRenderer {
    fn render(&self, _resume: &Value) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Pdf("renderer unavailable".to_string()))
    }
}

/// Parser returning whatever its function produces.
pub struct FakeParser(pub fn() -> Result<Value, LlmError>);

#[async_trait]
impl ResumeParser for FakeParser {
    async fn parse(&self, _resume_text: &str) -> Result<Value, LlmError> {
        (self.0)()
    }
}

/// Tailor scripted by job title: `fail*` errors, `empty` yields no content,
/// `panic` panics and anything else succeeds.
pub struct ScriptedTailor;

#[async_trait]
impl ResumeTailor for ScriptedTailor {
    async fn tailor(
        &self,
        _resume: &Value,
        job: &JobContext,
    ) -> Result<Option<TailoredResume>, LlmError> {
        match job.title.as_str() {
            t if t.starts_with("fail") => Err(LlmError::Api {
                status: 500,
                message: format!("tailor exploded on '{t}'"),
            }),
            "empty" => Ok(None),
            "panic" => panic!("scripted tailor panic"),
            _ => Ok(Some(sample_tailored_resume())),
        }
    }
}

/// Tailor that blocks each call until the test releases a permit.
pub struct GatedTailor {
    gate: Semaphore,
}

impl Default for GatedTailor {
    fn default() -> Self {
        Self {
            gate: Semaphore::new(0),
        }
    }
}

impl GatedTailor {
    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }
}

#[async_trait]
impl ResumeTailor for GatedTailor {
    async fn tailor(
        &self,
        _resume: &Value,
        _job: &JobContext,
    ) -> Result<Option<TailoredResume>, LlmError> {
        self.gate.acquire().await.expect("gate is never closed").forget();
        Ok(Some(sample_tailored_resume()))
    }
}

/// Scraper returning a fixed listing, or an error when `fail` is set.
pub struct FakeScraper {
    pub jobs: Vec<Value>,
    pub fail: bool,
}

#[async_trait]
impl JobScraper for FakeScraper {
    async fn search(&self, _query: &JobSearchQuery) -> Result<Vec<Value>, ScraperError> {
        if self.fail {
            return Err(ScraperError::Api {
                status: 502,
                message: "upstream down".to_string(),
            });
        }
        Ok(self.jobs.clone())
    }
}

/// Application state over a temp directory with offline collaborators.
/// The returned `TempDir` must outlive the state.
pub fn test_state(parser: FakeParser, scraper: FakeScraper) -> (TempDir, AppState) {
    let dir = TempDir::new().expect("temp dir");
    let config = Config {
        anthropic_api_key: String::new(),
        port: 0,
        rust_log: "info".to_string(),
        upload_dir: dir.path().join("uploads"),
        tailored_resumes_dir: dir.path().join("tailored_resumes"),
        jobs_api_url: None,
        job_search_days: 4,
        worker_count: 1,
        queue_capacity: 8,
    };
    let llm = LlmClient::new(String::new()).expect("llm client");
    let collaborators = Collaborators {
        text_extractor: Arc::new(DefaultTextExtractor),
        parser: Arc::new(parser),
        tailor: Arc::new(ScriptedTailor),
        renderer: Arc::new(StubRenderer),
        scraper: Arc::new(scraper),
    };
    let state = AppState::build(config, llm, collaborators).expect("state");
    (dir, state)
}
