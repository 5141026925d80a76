//! Turns a resume JSON document into an ordered list of styled paragraphs.
//!
//! Works on raw JSON rather than `TailoredResume` so hand-edited or older
//! artifacts (e.g. `position` instead of `title`) still render.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Contact,
    Heading,
    Subheading,
    Meta,
    Body,
    Bullet,
}

impl Style {
    pub fn font_size(self) -> f32 {
        match self {
            Style::Title => 18.0,
            Style::Contact => 9.0,
            Style::Heading => 12.0,
            Style::Subheading => 10.5,
            Style::Meta => 9.0,
            Style::Body | Style::Bullet => 10.0,
        }
    }

    pub fn bold(self) -> bool {
        matches!(self, Style::Title | Style::Heading | Style::Subheading)
    }

    pub fn indent_mm(self) -> f32 {
        match self {
            Style::Bullet => 4.0,
            _ => 0.0,
        }
    }

    pub fn space_before_pt(self) -> f32 {
        match self {
            Style::Heading => 10.0,
            Style::Subheading => 4.0,
            Style::Contact => 2.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: Style,
    pub text: String,
}

impl Paragraph {
    fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

pub const SEPARATOR: &str = " | ";

/// Lays out header, summary, experience, skills, education, certifications and
/// projects in that order. Sections with no content are skipped.
pub fn layout_resume(resume: &Value) -> Vec<Paragraph> {
    let mut out = Vec::new();
    add_header(&mut out, resume.get("contact_info").unwrap_or(&Value::Null));

    if let Some(summary) = text_of(resume, "summary") {
        out.push(Paragraph::new(Style::Heading, "PROFESSIONAL SUMMARY"));
        out.push(Paragraph::new(Style::Body, summary));
    }

    let sections: [(&str, &str, fn(&Value) -> Vec<Paragraph>); 5] = [
        ("work_experience", "PROFESSIONAL EXPERIENCE", experience_section),
        ("skills", "SKILLS", skills_section),
        ("education", "EDUCATION", education_section),
        ("certifications", "CERTIFICATIONS", certifications_section),
        ("projects", "PROJECTS", projects_section),
    ];

    for (key, heading, build) in sections {
        let Some(section) = resume.get(key) else {
            continue;
        };
        let body = build(section);
        if !body.is_empty() {
            out.push(Paragraph::new(Style::Heading, heading));
            out.extend(body);
        }
    }

    out
}

/// Display name used as the PDF document title.
pub fn document_title(resume: &Value) -> String {
    resume
        .get("contact_info")
        .and_then(|c| text_of(c, "name"))
        .unwrap_or_else(|| "Resume".to_string())
}

fn add_header(out: &mut Vec<Paragraph>, contact: &Value) {
    let name = text_of(contact, "name").unwrap_or_else(|| "Your Name".to_string());
    out.push(Paragraph::new(Style::Title, name));

    let parts: Vec<String> = ["email", "phone", "location", "linkedin", "github", "portfolio"]
        .iter()
        .filter_map(|key| text_of(contact, key))
        .collect();
    if !parts.is_empty() {
        out.push(Paragraph::new(Style::Contact, parts.join(SEPARATOR)));
    }
}

fn experience_section(section: &Value) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for job in section.as_array().into_iter().flatten() {
        let title = first_text(job, &["title", "position"]).unwrap_or_else(|| "Position".into());
        out.push(Paragraph::new(Style::Subheading, title));

        let mut meta = text_of(job, "company").unwrap_or_else(|| "Company".to_string());
        if let Some(location) = text_of(job, "location") {
            meta.push_str(SEPARATOR);
            meta.push_str(&location);
        }
        if let Some(start) = text_of(job, "start_date") {
            let end = text_of(job, "end_date").unwrap_or_else(|| "Present".to_string());
            meta.push_str(&format!(
                "{SEPARATOR}{} - {}",
                format_date(&start),
                format_date(&end)
            ));
        }
        out.push(Paragraph::new(Style::Meta, meta));

        out.extend(bullets(job.get("description")));
        out.extend(bullets(job.get("responsibilities")));
    }
    out
}

fn skills_section(section: &Value) -> Vec<Paragraph> {
    match section {
        Value::Object(categories) => categories
            .iter()
            .filter_map(|(category, skills)| {
                let listed = join_list(skills)?;
                Some(Paragraph::new(
                    Style::Body,
                    format!("{}: {listed}", title_case(category)),
                ))
            })
            .collect(),
        Value::Array(_) => join_list(section)
            .map(|listed| vec![Paragraph::new(Style::Body, listed)])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn education_section(section: &Value) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for edu in section.as_array().into_iter().flatten() {
        let degree = first_text(edu, &["degree", "title"]).unwrap_or_else(|| "Degree".into());
        out.push(Paragraph::new(Style::Subheading, degree));

        let mut meta =
            first_text(edu, &["institution", "school"]).unwrap_or_else(|| "Institution".into());
        if let Some(major) = text_of(edu, "major") {
            meta.push_str(SEPARATOR);
            meta.push_str(&major);
        }
        if let Some(date) = first_text(edu, &["graduation_date", "end_date"]) {
            meta.push_str(SEPARATOR);
            meta.push_str(&format_date(&date));
        }
        if let Some(gpa) = text_of(edu, "gpa") {
            meta.push_str(&format!("{SEPARATOR}GPA: {gpa}"));
        }
        out.push(Paragraph::new(Style::Meta, meta));
    }
    out
}

fn certifications_section(section: &Value) -> Vec<Paragraph> {
    section
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|cert| {
            let text = match cert {
                Value::Object(_) => {
                    let mut text = first_text(cert, &["title", "name"])?;
                    if let Some(issuer) = text_of(cert, "issuer") {
                        text.push_str(&format!(" - {issuer}"));
                    }
                    if let Some(date) = text_of(cert, "date") {
                        text.push_str(&format!(" ({})", format_date(&date)));
                    }
                    if let Some(description) = text_of(cert, "description") {
                        text.push_str(&format!(" - {description}"));
                    }
                    text
                }
                other => scalar_text(other)?,
            };
            Some(Paragraph::new(Style::Bullet, format!("- {text}")))
        })
        .collect()
}

fn projects_section(section: &Value) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for project in section.as_array().into_iter().flatten() {
        let name = first_text(project, &["title", "name"]).unwrap_or_else(|| "Project".into());
        out.push(Paragraph::new(Style::Subheading, name));

        let start = text_of(project, "start_date").map(|d| format_date(&d));
        let end = text_of(project, "end_date").map(|d| format_date(&d));
        let completed = text_of(project, "completion_date").map(|d| format_date(&d));
        let dates = match (start, end, completed) {
            (Some(start), Some(end), _) => Some(format!("{start} - {end}")),
            (Some(start), None, _) => Some(format!("Started: {start}")),
            (None, _, Some(done)) => Some(format!("Completed: {done}")),
            _ => None,
        };
        if let Some(dates) = dates {
            out.push(Paragraph::new(Style::Meta, dates));
        }

        match project.get("description") {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                out.push(Paragraph::new(Style::Body, s.trim()))
            }
            other => out.extend(bullets(other)),
        }

        if let Some(tech) = project.get("technologies_used").and_then(join_list) {
            out.push(Paragraph::new(Style::Body, format!("Technologies: {tech}")));
        }
        if let Some(url) = text_of(project, "url") {
            out.push(Paragraph::new(Style::Body, format!("URL: {url}")));
        }
    }
    out
}

fn bullets(value: Option<&Value>) -> Vec<Paragraph> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|t| Paragraph::new(Style::Bullet, format!("- {t}")))
            .collect(),
        Some(other) => scalar_text(other)
            .map(|t| vec![Paragraph::new(Style::Bullet, format!("- {t}"))])
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Reformats "YYYY-MM[-DD]" as "YYYY-Mon". "Present" and anything
/// unparsable pass through unchanged.
pub fn format_date(raw: &str) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let mut parts = raw.split('-');
    let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
        return raw.to_string();
    };
    match month.trim().parse::<usize>() {
        Ok(m @ 1..=12) => format!("{year}-{}", MONTHS[m - 1]),
        _ => raw.to_string(),
    }
}

/// "programming_languages" → "Programming Languages"
fn title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn join_list(value: &Value) -> Option<String> {
    let joined = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other)?,
    };
    (!joined.is_empty()).then_some(joined)
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn text_of(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(scalar_text)
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text_of(value, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headings(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs
            .iter()
            .filter(|p| p.style == Style::Heading)
            .map(|p| p.text.as_str())
            .collect()
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let resume = json!({
            "contact_info": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Engineer.",
            "projects": [{"title": "Engine", "description": ["Built it"], "technologies_used": ["Rust"]}],
            "skills": {"programming_languages": ["Rust", "Go"]},
            "work_experience": [{"company": "Acme", "title": "Engineer", "start_date": "2021-03", "description": ["Shipped"]}],
            "education": [{"institution": "MIT", "degree": "BSc"}],
            "certifications": ["CKA"]
        });
        let paragraphs = layout_resume(&resume);
        assert_eq!(
            headings(&paragraphs),
            vec![
                "PROFESSIONAL SUMMARY",
                "PROFESSIONAL EXPERIENCE",
                "SKILLS",
                "EDUCATION",
                "CERTIFICATIONS",
                "PROJECTS"
            ]
        );
        assert_eq!(paragraphs[0].text, "Ada Lovelace");
        assert_eq!(paragraphs[1].text, "ada@example.com");
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let resume = json!({
            "contact_info": {},
            "summary": "",
            "skills": {"frameworks": [], "other": []},
            "work_experience": [],
            "projects": []
        });
        let paragraphs = layout_resume(&resume);
        assert!(headings(&paragraphs).is_empty(), "got {paragraphs:?}");
        assert_eq!(paragraphs[0].text, "Your Name");
    }

    #[test]
    fn test_experience_meta_line() {
        let resume = json!({
            "work_experience": [{
                "company": "Acme",
                "title": "Engineer",
                "location": "Berlin",
                "start_date": "2020-01",
                "end_date": "Present",
                "description": ["Cut p99 latency by 40%"]
            }]
        });
        let paragraphs = layout_resume(&resume);
        let meta = paragraphs.iter().find(|p| p.style == Style::Meta).unwrap();
        assert_eq!(meta.text, "Acme | Berlin | 2020-Jan - Present");
        assert!(paragraphs
            .iter()
            .any(|p| p.style == Style::Bullet && p.text == "- Cut p99 latency by 40%"));
    }

    #[test]
    fn test_skill_categories_are_title_cased() {
        let resume = json!({"skills": {"programming_languages": ["Rust"], "soft_skills": ["Mentoring"]}});
        let texts: Vec<String> = layout_resume(&resume).into_iter().map(|p| p.text).collect();
        assert!(texts.contains(&"Programming Languages: Rust".to_string()));
        assert!(texts.contains(&"Soft Skills: Mentoring".to_string()));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2021-03"), "2021-Mar");
        assert_eq!(format_date("2019-12-01"), "2019-Dec");
        assert_eq!(format_date("Present"), "Present");
        assert_eq!(format_date("2021-13"), "2021-13");
        assert_eq!(format_date("Spring 2020"), "Spring 2020");
    }

    #[test]
    fn test_document_title_falls_back() {
        assert_eq!(document_title(&json!({})), "Resume");
        assert_eq!(
            document_title(&json!({"contact_info": {"name": "Grace Hopper"}})),
            "Grace Hopper"
        );
    }
}
