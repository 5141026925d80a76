// LLM prompt constants for resume tailoring.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::models::job::JobContext;

/// Role description prepended to the shared JSON-only system prompt.
pub const TAILOR_ROLE: &str = "You tailor resume sections (summary, skills, work_experience, projects) \
    to match a specific job opportunity. You receive the full resume and a job context with title, \
    company, industry, level, requirements and description, and use that context to decide what to emphasise.";

/// Tailoring rules and the required output schema.
pub const TAILOR_RULES: &str = r#"Rules:
1. NO FABRICATION: Only use information present in the original resume.
2. PRESERVE ALL CONTENT: Keep all bullet points, responsibilities, and achievements.
3. ENHANCE WITH KEYWORDS: Incorporate relevant keywords from the job description and requirements.
4. MAINTAIN STRUCTURE: Keep the same field names and organization.
5. CONTEXT-AWARE: Use job title, company, industry, and level to guide your tailoring approach.

REQUIRED OUTPUT STRUCTURE:
{
  "contact_info": {
    "name": "Full name",
    "email": "email@example.com",
    "phone": "phone number",
    "linkedin": "LinkedIn URL",
    "github": "GitHub URL",
    "portfolio": "Portfolio URL"
  },
  "summary": "tailored professional summary",
  "skills": {
    "programming_languages": ["language1"],
    "frameworks": ["framework1"],
    "databases": ["database1"],
    "languages": ["spoken language1"],
    "soft_skills": ["skill1"],
    "other": ["other skill1"]
  },
  "work_experience": [
    {
      "company": "string",
      "title": "string",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM or Present",
      "location": "Job location",
      "description": ["bullet1", "bullet2"]
    }
  ],
  "education": [
    {
      "institution": "University Name",
      "degree": "Degree Type",
      "major": "Field of Study",
      "graduation_date": "YYYY-MM",
      "gpa": "GPA if mentioned",
      "location": "Institution location"
    }
  ],
  "projects": [
    {
      "title": "string",
      "description": ["desc1", "desc2"],
      "url": "Project URL if available",
      "technologies_used": ["tech1", "tech2"]
    }
  ],
  "certifications": ["cert1"],
  "awards_and_honors": ["award1"],
  "languages": ["language1"]
}

Tailoring guidelines:
- Contact Info: preserve exactly as provided.
- Summary: rewrite to address the specific role and company while staying authentic.
- Skills: prioritise skills that match the job requirements and industry.
- Work Experience: strengthen bullet points with action verbs and relevant keywords.
- Education, Certifications, Awards, Languages: preserve exactly as provided.
- Projects: highlight technologies and outcomes that align with the role."#;

pub fn tailor_system_prompt() -> String {
    format!("{TAILOR_ROLE}\n\n{JSON_ONLY_SYSTEM}\n\n{NO_FABRICATION_INSTRUCTION}\n{PLAIN_TEXT_INSTRUCTION}")
}

pub fn build_tailor_prompt(resume_json: &str, job: &JobContext) -> String {
    let or_na = |s: &str| {
        if s.trim().is_empty() {
            "N/A".to_string()
        } else {
            s.to_string()
        }
    };

    format!(
        r#"Tailor the following resume for the job opportunity below.

Resume:
---
{resume_json}
---

Job Context:
---
Title: {title}
Company: {company}
Location: {location}
Job Level: {job_level}
Job Function: {job_function}
Industry: {industry}
Remote: {remote}
Job Type: {job_type}
Required Skills: {skills}
Experience Range: {experience}
Company Size: {company_size}
Salary Range: {min} - {max} {currency}

Job Description:
{description}

Company Description:
{company_description}
---

{rules}

CRITICAL REMINDERS:
1. Return ONLY a valid JSON object. Your response must start with {{ and end with }}.
2. Do not remove any bullet points, responsibilities, or achievements. Enhance them, don't delete them.
3. Keep the same number of bullet points in each section as the original resume."#,
        title = or_na(&job.title),
        company = or_na(&job.company),
        location = or_na(&job.location),
        job_level = or_na(&job.job_level),
        job_function = or_na(&job.job_function),
        industry = or_na(&job.company_industry),
        remote = job.is_remote,
        job_type = or_na(&job.job_type),
        skills = or_na(&job.skills),
        experience = or_na(&job.experience_range),
        company_size = or_na(&job.company_num_employees),
        min = job.min_amount,
        max = job.max_amount,
        currency = job.currency,
        description = job.description.replace(|c: char| c == '\r' || c == '\n', " "),
        company_description = or_na(&job.company_description),
        rules = TAILOR_RULES,
    )
}
