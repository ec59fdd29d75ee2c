//! Summary requester — formats the CV prompt and delegates to the
//! completion collaborator, sorting failures into the two classes the
//! pipeline distinguishes.

use thiserror::Error;

use crate::analysis::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::llm_client::{LlmClient, LlmError};
use crate::text::truncate_chars;

/// Hard bound on CV text embedded in the prompt, in characters. This is
/// truncation, not summarization: anything past the bound is dropped.
pub const PROMPT_CV_CHARS: usize = 4000;

#[derive(Debug, Error)]
pub enum SummaryError {
    /// AI summary requested but no completion client is configured.
    #[error("AI summary unavailable: {0}")]
    Configuration(String),

    /// The completion call itself failed.
    #[error("AI summary failed: {0}")]
    Upstream(#[from] LlmError),
}

/// Requests an AI summary of the CV text.
///
/// Failures here are non-fatal to the pipeline: the caller surfaces them as
/// a warning and continues with scoring alone.
pub async fn summarize(
    llm: Option<&LlmClient>,
    cv_text: &str,
    model_override: Option<&str>,
) -> Result<String, SummaryError> {
    let llm = llm
        .ok_or_else(|| SummaryError::Configuration("AI_API_KEY is not configured".to_string()))?;
    let prompt = build_summary_prompt(cv_text);
    Ok(llm.complete(&prompt, model_override).await?)
}

fn build_summary_prompt(cv_text: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{cv_text}", truncate_chars(cv_text, PROMPT_CV_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_prompt_embeds_cv_text() {
        let prompt = build_summary_prompt("John Doe, 6 years of python");
        assert!(prompt.contains("John Doe, 6 years of python"));
        assert!(!prompt.contains("{cv_text}"));
    }

    #[test]
    fn test_prompt_asks_for_the_fixed_fields() {
        let prompt = build_summary_prompt("cv");
        for field in [
            "name",
            "experience",
            "skills",
            "Education",
            "achievements",
            "seniority",
        ] {
            assert!(prompt.contains(field), "prompt missing {field:?}");
        }
    }

    #[test]
    fn test_prompt_truncates_cv_to_4000_chars() {
        let cv = format!("{}MARKER", "a".repeat(PROMPT_CV_CHARS));
        let prompt = build_summary_prompt(&cv);
        assert!(prompt.contains(&"a".repeat(PROMPT_CV_CHARS)));
        assert!(!prompt.contains("MARKER"));
    }

    #[tokio::test]
    async fn test_missing_client_is_configuration_error() {
        let err = summarize(None, "cv text", None).await.unwrap_err();
        assert!(matches!(err, SummaryError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "backend overloaded"}
            })))
            .mount(&server)
            .await;

        let client = LlmClient::with_endpoint(
            "test-key".to_string(),
            "llama3-70b-8192".to_string(),
            server.uri(),
        );
        let err = summarize(Some(&client), "cv text", None).await.unwrap_err();
        assert!(matches!(err, SummaryError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_successful_summary_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Senior analyst, 10 years."}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::with_endpoint(
            "test-key".to_string(),
            "llama3-70b-8192".to_string(),
            server.uri(),
        );
        let summary = summarize(Some(&client), "cv text", None).await.unwrap();
        assert_eq!(summary, "Senior analyst, 10 years.");
    }
}
