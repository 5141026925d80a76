use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::scraper::JobSearchQuery;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 20;

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub location: String,
    pub limit: Option<usize>,
    pub proxy: Option<String>,
}

#[derive(Serialize)]
pub struct JobSearchResponse {
    pub jobs: Vec<Value>,
    pub total_count: usize,
    pub search_term: String,
    pub location: String,
}

/// GET /api/search
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let query = JobSearchQuery {
        search_term: params.query,
        location: params.location,
        days: state.config.job_search_days,
        proxy: params.proxy.filter(|p| !p.trim().is_empty()),
    };

    let mut jobs = state.scraper.search(&query).await.map_err(|e| {
        warn!(search_term = %query.search_term, "Job search failed: {e}");
        AppError::Upstream(format!("Job search failed: {e}"))
    })?;
    if jobs.is_empty() {
        return Err(AppError::NotFound(
            "No jobs found or scraping failed".to_string(),
        ));
    }
    jobs.truncate(params.limit.unwrap_or(DEFAULT_LIMIT));

    Ok(Json(JobSearchResponse {
        total_count: jobs.len(),
        jobs,
        search_term: query.search_term,
        location: query.location,
    }))
}
