mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod text;
mod webhook;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::scoring::HeuristicScorer;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CvScreen API v{}", env!("CARGO_PKG_VERSION"));

    // The completion client only exists when a credential is configured;
    // without one the pipeline still runs and surfaces a warning instead.
    let llm = match &config.ai_api_key {
        Some(key) => {
            info!("Completion client initialized (model: {})", config.ai_model);
            Some(LlmClient::new(key.clone(), config.ai_model.clone()))
        }
        None => {
            warn!("AI_API_KEY not set — AI summaries disabled");
            None
        }
    };

    let webhook = WebhookClient::new(config.webhook_shared_secret.clone());

    // Default scorer. Swappable behind the CvScorer trait.
    let scorer = Arc::new(HeuristicScorer);

    let state = AppState {
        config,
        llm,
        webhook,
        scorer,
    };

    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.port).parse()?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
