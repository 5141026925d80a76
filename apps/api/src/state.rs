use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::extraction::orchestrator::{ExtractionOrchestrator, ExtractionRunner};
use crate::extraction::parser::ResumeParser;
use crate::extraction::registry::ResumeRegistry;
use crate::extraction::text::DocumentTextExtractor;
use crate::llm_client::LlmClient;
use crate::render::ResumeRenderer;
use crate::scraper::JobScraper;
use crate::storage::ArtifactStore;
use crate::tailoring::tailor::ResumeTailor;
use crate::tailoring::tracker::{BatchRunner, BatchStore, TailoringTracker};
use crate::workers::QueueConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Used directly only for the credential probe; services hold their own clones.
    pub llm: LlmClient,
    pub resumes: Arc<ResumeRegistry>,
    pub extraction: Arc<ExtractionOrchestrator>,
    pub tailoring: Arc<TailoringTracker>,
    /// Tailored JSON/PDF artifacts.
    pub artifacts: ArtifactStore,
    pub renderer: Arc<dyn ResumeRenderer>,
    pub scraper: Arc<dyn JobScraper>,
}

/// The pluggable external collaborators.
pub struct Collaborators {
    pub text_extractor: Arc<dyn DocumentTextExtractor>,
    pub parser: Arc<dyn ResumeParser>,
    pub tailor: Arc<dyn ResumeTailor>,
    pub renderer: Arc<dyn ResumeRenderer>,
    pub scraper: Arc<dyn JobScraper>,
}

impl AppState {
    /// Creates the storage directories and starts both worker pools.
    /// Must be called inside a Tokio runtime.
    pub fn build(config: Config, llm: LlmClient, collaborators: Collaborators) -> Result<Self> {
        let uploads = ArtifactStore::new(&config.upload_dir)
            .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;
        let artifacts = ArtifactStore::new(&config.tailored_resumes_dir).with_context(|| {
            format!(
                "Failed to create tailored resumes dir {}",
                config.tailored_resumes_dir.display()
            )
        })?;
        let queue = QueueConfig {
            workers: config.worker_count,
            capacity: config.queue_capacity,
        };

        let resumes = Arc::new(ResumeRegistry::new(uploads));
        let extraction_runner = Arc::new(ExtractionRunner::new(
            resumes.clone(),
            collaborators.text_extractor,
            collaborators.parser,
        ));
        let extraction = ExtractionOrchestrator::start(resumes.clone(), extraction_runner, queue);

        let batches = Arc::new(BatchStore::default());
        let batch_runner = Arc::new(BatchRunner::new(
            batches.clone(),
            artifacts.clone(),
            collaborators.tailor,
            collaborators.renderer.clone(),
        ));
        let tailoring = TailoringTracker::start(resumes.clone(), batches, batch_runner, queue);

        Ok(Self {
            config,
            llm,
            resumes,
            extraction: Arc::new(extraction),
            tailoring: Arc::new(tailoring),
            artifacts,
            renderer: collaborators.renderer,
            scraper: collaborators.scraper,
        })
    }
}
