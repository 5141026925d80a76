use uuid::Uuid;

use crate::models::job::{text_field, JobDescription};

const UNKNOWN: &str = "Unknown";

/// Keeps alphanumerics, spaces, hyphens and underscores, then trims trailing
/// whitespace.
pub fn sanitize_component(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    kept.trim_end().to_string()
}

/// `<resume_id>_<company>_<title>_<index>`. The index keeps names unique
/// within a batch even when company and title repeat.
pub fn artifact_base_name(resume_id: Uuid, job: &JobDescription, index: usize) -> String {
    let company = text_field(job, "company").unwrap_or_else(|| UNKNOWN.to_string());
    let title = text_field(job, "title").unwrap_or_else(|| UNKNOWN.to_string());
    format!(
        "{resume_id}_{}_{}_{index}",
        sanitize_component(&company),
        sanitize_component(&title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(value: serde_json::Value) -> JobDescription {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_component("Acme, Inc."), "Acme Inc");
        assert_eq!(sanitize_component("Sr. Engineer (Rust/C++)"), "Sr Engineer RustC");
        assert_eq!(sanitize_component("data-platform_team  "), "data-platform_team");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_component("Zürich Café!"), "Zürich Café");
    }

    #[test]
    fn test_index_disambiguates_identical_jobs() {
        let id = Uuid::new_v4();
        let desc = job(json!({"title": "Engineer", "company": "Acme"}));
        let first = artifact_base_name(id, &desc, 0);
        let second = artifact_base_name(id, &desc, 1);
        assert_eq!(first, format!("{id}_Acme_Engineer_0"));
        assert_eq!(second, format!("{id}_Acme_Engineer_1"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_fields_use_unknown() {
        let id = Uuid::new_v4();
        assert_eq!(
            artifact_base_name(id, &job(json!({})), 3),
            format!("{id}_Unknown_Unknown_3")
        );
    }
}
