use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Raw resume uploads, keyed `<resume_id>_<filename>`.
    pub upload_dir: PathBuf,
    /// Tailored JSON/PDF artifacts.
    pub tailored_resumes_dir: PathBuf,
    /// Base URL of a JobSpy-compatible search service. Job search is disabled when unset.
    pub jobs_api_url: Option<String>,
    pub job_search_days: u32,
    pub worker_count: usize,
    pub queue_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            tailored_resumes_dir: std::env::var("TAILORED_RESUMES_DIR")
                .unwrap_or_else(|_| "tailored_resumes".to_string())
                .into(),
            jobs_api_url: std::env::var("JOBS_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            job_search_days: parse_env("JOB_SEARCH_DAYS", 4)?,
            worker_count: parse_env::<usize>("WORKER_COUNT", 2)?.max(1),
            queue_capacity: parse_env::<usize>("QUEUE_CAPACITY", 32)?.max(1),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u16 = parse_env("TAILOR_API_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(value, 8000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TAILOR_API_TEST_BAD_WORKERS", "many");
        let result: Result<usize> = parse_env("TAILOR_API_TEST_BAD_WORKERS", 2);
        assert!(result.is_err(), "non-numeric value must fail startup");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("TAILOR_API_TEST_BAD_WORKERS"));
    }
}
