/// LLM client — the single point of entry for all completion-collaborator
/// calls. No other module talks to the Groq API directly.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::text::truncate_chars;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MAX_TOKENS: u32 = 400;
const TEMPERATURE: f32 = 0.2;
/// Upper bound on a single completion call, aligned with the webhook's
/// delivery bound. A hanging upstream stalls one request cycle, not the
/// whole service.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);
/// Cap on the raw-response rendering used when no known shape matches.
const RAW_FALLBACK_CHARS: usize = 3000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the chat-completions endpoint with a bounded timeout and
/// shape-tolerant response decoding.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(api_key, model, GROQ_API_URL.to_string())
    }

    /// Same as `new` but pointed at an explicit endpoint. Tests use this to
    /// target a local mock server.
    pub fn with_endpoint(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
            endpoint,
        }
    }

    /// Sends a single-turn completion request and returns the normalized
    /// response text. Model resolution: explicit override, else the
    /// configured default.
    pub async fn complete(
        &self,
        prompt: &str,
        model_override: Option<&str>,
    ) -> Result<String, LlmError> {
        let model = model_override.unwrap_or(&self.model);
        let request_body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = response.json().await?;
        let text = response_text(&value);
        debug!("completion succeeded: model={model}, {} chars", text.len());
        Ok(text)
    }
}

/// Normalizes a completion response into plain text.
///
/// Responses arrive in more than one shape depending on endpoint and model.
/// Each known shape is tried in order; an unrecognized response is rendered
/// raw (truncated) rather than becoming an error.
pub(crate) fn response_text(value: &Value) -> String {
    // Shape A: chat completion — choices[0].message.content
    if let Some(text) = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return text.trim().to_string();
    }
    // Shape B: legacy completion — choices[0].text
    if let Some(text) = value.pointer("/choices/0/text").and_then(Value::as_str) {
        return text.trim().to_string();
    }
    // Shape C: bare content/text at the top level
    for key in ["content", "text"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            return text.trim().to_string();
        }
    }
    truncate_chars(&value.to_string(), RAW_FALLBACK_CHARS).to_string()
}
