use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::evaluator::Evaluator;
use crate::llm_client::ReasoningClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds configuration and the reasoning client only; nothing per-request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub evaluator: Evaluator,
}

impl AppState {
    pub fn new(config: Config, reasoning: Arc<dyn ReasoningClient>) -> Self {
        Self {
            config,
            evaluator: Evaluator::new(reasoning),
        }
    }
}
