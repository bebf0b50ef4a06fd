// Resume matching: multipart intake, prompt composition, scoring hand-off.
// Scoring goes through llm_client::ScoringService only.

pub mod handlers;
pub mod prompts;
pub mod upload;
