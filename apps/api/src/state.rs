use std::sync::Arc;

use crate::analysis::scoring::CvScorer;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::webhook::WebhookClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Present only when AI_API_KEY is configured. Pipeline handlers that
    /// find `None` here surface a configuration warning and continue
    /// without a summary.
    pub llm: Option<LlmClient>,
    pub webhook: WebhookClient,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn CvScorer>,
}
