use std::sync::Arc;

use crate::config::Config;
use crate::matching::orchestrator::MatchOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Lexicon, patterns, variation table and NLP backends. Read-only after startup.
    pub matcher: Arc<MatchOrchestrator>,
    pub config: Config,
}
