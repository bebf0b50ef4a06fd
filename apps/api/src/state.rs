use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::ScoringService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Document backends, keyed by declared format.
    pub extractors: Arc<ExtractorRegistry>,
    /// Pluggable scorer. Default: GeminiClient; tests swap in a fake.
    pub scorer: Arc<dyn ScoringService>,
    pub config: Config,
}
