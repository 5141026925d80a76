//! Structured extraction: resume text → resume JSON via the LLM.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::extraction::prompts::{build_parse_prompt, PARSE_SYSTEM};
use crate::llm_client::{extract_json_object, LlmClient, LlmError};

/// Parses raw resume text into a structured JSON object.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, resume_text: &str) -> Result<Value, LlmError>;
}

pub struct LlmResumeParser {
    llm: LlmClient,
}

impl LlmResumeParser {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeParser for LlmResumeParser {
    async fn parse(&self, resume_text: &str) -> Result<Value, LlmError> {
        let prompt = build_parse_prompt(resume_text);
        let raw = self.llm.call_text(&prompt, PARSE_SYSTEM).await?;
        debug!("Resume parser returned {} chars", raw.len());
        decode_parsed_resume(&raw).ok_or(LlmError::Unparseable)
    }
}

/// Locates the resume object in the model output, unwrapping a top-level
/// `resume_latest` envelope when present. An empty object counts as no result.
pub fn decode_parsed_resume(raw: &str) -> Option<Value> {
    let mut value = extract_json_object(raw)?;
    if let Some(inner) = value.get_mut("resume_latest").map(Value::take) {
        value = inner;
    }
    value
        .as_object()
        .is_some_and(|fields| !fields.is_empty())
        .then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_object() {
        let value = decode_parsed_resume(r#"{"summary": "Rust dev"}"#).unwrap();
        assert_eq!(value["summary"], "Rust dev");
    }

    #[test]
    fn test_decode_unwraps_resume_latest() {
        let raw = "```json\n{\"resume_latest\": {\"contact_info\": {\"name\": \"Ada\"}}}\n```";
        let value = decode_parsed_resume(raw).unwrap();
        assert_eq!(value["contact_info"]["name"], "Ada");
        assert!(value.get("resume_latest").is_none());
    }

    #[test]
    fn test_decode_rejects_non_object_envelope() {
        assert!(decode_parsed_resume(r#"{"resume_latest": "nope"}"#).is_none());
        assert!(decode_parsed_resume("I could not read this resume.").is_none());
    }

    #[test]
    fn test_decode_rejects_empty_object() {
        assert!(decode_parsed_resume("{}").is_none());
        assert!(decode_parsed_resume(r#"{"resume_latest": {}}"#).is_none());
    }

    #[test]
    fn test_prompt_embeds_resume_text() {
        let prompt = build_parse_prompt("Ada Lovelace\nAnalyst");
        assert!(prompt.contains("Ada Lovelace\nAnalyst"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
