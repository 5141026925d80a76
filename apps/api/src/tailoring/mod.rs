// Tailoring: one batch per submission, one subjob per job description.
// Batches run on the tailoring work queue; subjobs within a batch are sequential.

pub mod handlers;
pub mod models;
pub mod naming;
pub mod prompts;
pub mod tailor;
pub mod tracker;
