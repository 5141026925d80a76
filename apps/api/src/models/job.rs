use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A job posting as submitted by the client: a loose bag of named fields
/// (title, company, description, ...), usually copied from a search result.
pub type JobDescription = Map<String, Value>;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// The job context handed to the tailoring service. Every field is present;
/// absent inputs default to an empty string (or `false` for `is_remote`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_level: String,
    pub job_function: String,
    pub company_industry: String,
    pub description: String,
    pub skills: String,
    pub experience_range: String,
    pub is_remote: bool,
    pub job_type: String,
    pub company_description: String,
    pub company_num_employees: String,
    pub min_amount: String,
    pub max_amount: String,
    pub currency: String,
}

impl JobContext {
    pub fn from_description(desc: &JobDescription) -> Self {
        let text = |key: &str| text_field(desc, key).unwrap_or_default();
        Self {
            title: text("title"),
            company: text("company"),
            location: text("location"),
            job_level: text("job_level"),
            job_function: text("job_function"),
            company_industry: text("company_industry"),
            description: text("description"),
            skills: text("skills"),
            experience_range: text("experience_range"),
            is_remote: bool_field(desc, "is_remote"),
            job_type: text("job_type"),
            company_description: text("company_description"),
            company_num_employees: text("company_num_employees"),
            min_amount: text("min_amount"),
            max_amount: text("max_amount"),
            currency: text("currency"),
        }
    }
}

/// Reads a field as text. Numbers and booleans are rendered; null, arrays and
/// objects count as absent.
pub fn text_field(desc: &JobDescription, key: &str) -> Option<String> {
    match desc.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn bool_field(desc: &JobDescription, key: &str) -> bool {
    match desc.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
