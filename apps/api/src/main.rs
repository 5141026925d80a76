mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod render;
mod routes;
mod scraper;
mod state;
mod storage;
mod tailoring;
#[cfg(test)]
mod test_support;
mod workers;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::parser::LlmResumeParser;
use crate::extraction::text::DefaultTextExtractor;
use crate::llm_client::LlmClient;
use crate::render::PdfRenderer;
use crate::routes::build_router;
use crate::scraper::{HttpJobScraper, JobScraper, UnconfiguredJobScraper};
use crate::state::{AppState, Collaborators};
use crate::tailoring::tailor::LlmResumeTailor;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeTailor API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let scraper: Arc<dyn JobScraper> = match &config.jobs_api_url {
        Some(url) => {
            info!("Job search backed by {url}");
            Arc::new(HttpJobScraper::new(url)?)
        }
        None => {
            warn!("JOBS_API_URL is not set, job search is disabled");
            Arc::new(UnconfiguredJobScraper)
        }
    };

    let collaborators = Collaborators {
        text_extractor: Arc::new(DefaultTextExtractor),
        parser: Arc::new(LlmResumeParser::new(llm.clone())),
        tailor: Arc::new(LlmResumeTailor::new(llm.clone())),
        renderer: Arc::new(PdfRenderer),
        scraper,
    };
    let state = AppState::build(config.clone(), llm, collaborators)?;
    info!(
        workers = config.worker_count,
        capacity = config.queue_capacity,
        "Worker pools started"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
