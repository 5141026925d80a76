//! Structured resume document produced by the tailoring service.
//!
//! Extracted resumes are kept as free-form JSON (users may hand-edit them), but
//! tailored output is validated against this shape before it is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub title: String,
    /// "YYYY-MM"
    pub start_date: String,
    /// "YYYY-MM" or "Present"
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

/// A resume rewritten for one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub contact_info: ContactInfo,
    pub summary: String,
    pub skills: Skills,
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub awards_and_honors: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tailored_resume_accepts_minimal_document() {
        let json = serde_json::json!({
            "contact_info": {"name": "Ada Lovelace"},
            "summary": "Systems engineer focused on Rust services.",
            "skills": {"programming_languages": ["Rust"]},
            "work_experience": [{
                "company": "Acme",
                "title": "Engineer",
                "start_date": "2021-03",
                "description": ["Built the ingestion pipeline"]
            }],
            "projects": []
        });
        let resume: TailoredResume = serde_json::from_value(json).unwrap();
        assert_eq!(resume.contact_info.name.as_deref(), Some("Ada Lovelace"));
        assert!(resume.education.is_empty());
        assert!(resume.skills.frameworks.is_empty());
        assert_eq!(resume.work_experience[0].end_date, None);
    }

    #[test]
    fn test_tailored_resume_requires_summary() {
        let json = serde_json::json!({
            "contact_info": {},
            "skills": {},
            "work_experience": [],
            "projects": []
        });
        let result: Result<TailoredResume, _> = serde_json::from_value(json);
        assert!(result.is_err(), "a tailored resume without a summary must be rejected");
    }
}
