use anyhow::{Context, Result};

/// Fallback model identifier used when AI_MODEL is not set.
pub const DEFAULT_AI_MODEL: &str = "llama3-70b-8192";

const DEFAULT_WEBHOOK_SECRET: &str = "dev-secret";

/// Application configuration loaded from environment variables once at
/// startup and passed down through `AppState`. Nothing reads the
/// environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion-collaborator credential. Optional: without it the service
    /// still runs, with AI summaries disabled.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub webhook_shared_secret: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_api_key: optional_env("AI_API_KEY"),
            ai_model: std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            webhook_shared_secret: std::env::var("WEBHOOK_SHARED_SECRET")
                .unwrap_or_else(|_| DEFAULT_WEBHOOK_SECRET.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
