// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Shared no-fabrication rule for every prompt that rewrites resume content.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only use information present in the original resume. \
    Do NOT invent employers, dates, degrees, metrics, or technologies. \
    If the resume does not support a claim, omit it.";

/// Output must be plain text inside JSON string values.
pub const PLAIN_TEXT_INSTRUCTION: &str =
    "Do not use markdown or any other formatting inside string values.";
