// Resume intake: upload registry, text extraction and LLM parsing.
// Background runs go through the extraction work queue (see orchestrator).

pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod registry;
pub mod text;
