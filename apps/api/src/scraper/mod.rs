//! Job search collaborator.
//!
//! Listings come from a JobSpy-compatible HTTP service; postings are passed
//! through untouched as JSON objects.

pub mod handlers;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const SEARCH_PATH: &str = "/api/v1/search_jobs";
const RESULTS_WANTED: u32 = 20;
const REQUEST_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Clone)]
pub struct JobSearchQuery {
    pub search_term: String,
    pub location: String,
    /// Only postings newer than this many days.
    pub days: u32,
    pub proxy: Option<String>,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("job scraper is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scraper returned status {status}: {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait JobScraper: Send + Sync {
    async fn search(&self, query: &JobSearchQuery) -> Result<Vec<Value>, ScraperError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs: Vec<Value>,
}

pub struct HttpJobScraper {
    client: Client,
    base_url: String,
}

impl HttpJobScraper {
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobScraper for HttpJobScraper {
    async fn search(&self, query: &JobSearchQuery) -> Result<Vec<Value>, ScraperError> {
        let mut params = vec![
            ("site_name", "linkedin".to_string()),
            ("search_term", query.search_term.clone()),
            ("location", query.location.clone()),
            ("results_wanted", RESULTS_WANTED.to_string()),
            ("hours_old", hours_old(query.days).to_string()),
            ("linkedin_fetch_description", "true".to_string()),
        ];
        if let Some(proxy) = &query.proxy {
            params.push(("proxies", proxy.clone()));
        }

        let response = self
            .client
            .get(format!("{}{SEARCH_PATH}", self.base_url))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScraperError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        debug!(
            search_term = %query.search_term,
            location = %query.location,
            "Scraper returned {} jobs",
            body.jobs.len()
        );
        Ok(body.jobs)
    }
}

fn hours_old(days: u32) -> u32 {
    days.saturating_mul(24)
}

/// Stand-in used when no scraping service is configured.
pub struct UnconfiguredJobScraper;

#[async_trait]
impl JobScraper for UnconfiguredJobScraper {
    async fn search(&self, _query: &JobSearchQuery) -> Result<Vec<Value>, ScraperError> {
        Err(ScraperError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let scraper = HttpJobScraper::new("http://jobs.local:8000/").unwrap();
        assert_eq!(scraper.base_url, "http://jobs.local:8000");
    }

    #[test]
    fn test_hours_old_saturates() {
        assert_eq!(hours_old(4), 96);
        assert_eq!(hours_old(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_search_response_tolerates_missing_jobs() {
        let body: SearchResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(body.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_scraper_errors() {
        let query = JobSearchQuery {
            search_term: "rust".to_string(),
            location: "Berlin".to_string(),
            days: 4,
            proxy: None,
        };
        let err = UnconfiguredJobScraper.search(&query).await.unwrap_err();
        assert_eq!(err.to_string(), "job scraper is not configured");
    }
}
