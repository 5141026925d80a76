// LLM prompt constants for resume parsing.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume parsing.
pub const PARSE_SYSTEM: &str = "You are an expert resume parser. \
    You extract every piece of information from a resume into structured JSON. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Resume parsing prompt template. Replace `{resume_text}` before sending.
pub const PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following resume text and extract all information into a structured JSON object.

Return ONLY a valid JSON object with this structure:
{
  "contact_info": {
    "name": "Full name",
    "email": "email@example.com",
    "phone": "phone number",
    "linkedin": "LinkedIn URL",
    "github": "GitHub URL",
    "portfolio": "Portfolio URL"
  },
  "summary": "Professional summary",
  "work_experience": [
    {
      "company": "Company Name",
      "title": "Job Title",
      "start_date": "YYYY-MM",
      "end_date": "YYYY-MM or Present",
      "location": "Job location",
      "description": ["responsibility 1", "responsibility 2"]
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
  "skills": {
    "programming_languages": ["language1", "language2"],
    "frameworks": ["framework1", "framework2"],
    "databases": ["database1", "database2"],
    "languages": ["spoken language1", "spoken language2"],
    "soft_skills": ["skill1", "skill2"],
    "other": ["other skill1", "other skill2"]
  },
  "projects": [
    {
      "title": "Project Name",
      "description": ["description1", "description2"],
      "url": "Project URL if available",
      "technologies_used": ["tech1", "tech2"]
    }
  ],
  "certifications": ["cert1", "cert2"],
  "awards_and_honors": ["award1", "award2"],
  "languages": ["language1", "language2"]
}

Extract ALL information found in the resume. Use null for missing optional fields and empty arrays for missing lists.

Resume Text:
---
{resume_text}
---

Your response must start with { and end with }. NO other text allowed."#;

pub fn build_parse_prompt(resume_text: &str) -> String {
    PARSE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
