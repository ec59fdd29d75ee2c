//! Axum route handlers for the screening API.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::extract::extract_text;
use crate::analysis::report::{assemble, download_link, DownloadLink, ResultRecord};
use crate::analysis::scoring::ScoreResult;
use crate::analysis::summarize::{summarize, SummaryError};
use crate::errors::AppError;
use crate::state::AppState;

/// Example CV for clients that want to exercise the pipeline without a real
/// upload.
pub const EXAMPLE_CV: &str = "John Doe\nData Analyst\n\n6 years of experience building reporting pipelines in Python and SQL.\nSkills: python, sql, excel, pandas, communication.\nEducation: Bachelor of Science in Statistics.\nAwarded Analyst of the Year 2023.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub cv_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub cv_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub scores: ScoreResult,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub cv_text: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookOutcome {
    pub delivered: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub record: ResultRecord,
    pub download: DownloadLink,
    /// Set when an AI summary was requested but failed; scoring still ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_warning: Option<String>,
    /// Absent unless delivery was opted into and given an endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookOutcome>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Accepts a multipart form with a `file` field holding PDF bytes and
/// returns the best-effort extracted text. Extraction failure is not an
/// error; it degrades to an empty string.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("file") {
            file_bytes = Some(field.bytes().await.map_err(bad_multipart)?.to_vec());
        }
    }
    let bytes =
        file_bytes.ok_or_else(|| AppError::Validation("missing file field".to_string()))?;

    let cv_text = extract_text(&bytes);
    info!(
        "extracted {} chars from a {} byte upload",
        cv_text.len(),
        bytes.len()
    );
    Ok(Json(ExtractResponse { cv_text }))
}

/// POST /api/v1/score
///
/// Scores pasted or previously extracted CV text against a job description.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    if request.cv_text.is_empty() {
        return Err(AppError::Validation("no CV text to score".to_string()));
    }
    let scores = state
        .scorer
        .score(&request.cv_text, &request.job_description)
        .await?;
    Ok(Json(ScoreResponse { scores }))
}

/// POST /api/v1/summarize
///
/// Direct summary endpoint. Unlike the pipeline, failure here is the
/// response: 503 when no credential is configured, 502 when the upstream
/// call fails.
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    if request.cv_text.is_empty() {
        return Err(AppError::Validation("no CV text to summarize".to_string()));
    }
    let summary = summarize(state.llm.as_ref(), &request.cv_text, request.model.as_deref())
        .await
        .map_err(|e| match e {
            SummaryError::Configuration(msg) => AppError::Configuration(msg),
            SummaryError::Upstream(err) => AppError::Upstream(err.to_string()),
        })?;
    Ok(Json(SummarizeResponse { summary }))
}

/// POST /api/v1/analyze
///
/// Full pipeline: extract → score → optional AI summary → assemble →
/// optional webhook delivery. Summary and webhook failures are demoted to
/// warnings in the response; the scored record is returned regardless.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_analyze_form(&mut multipart).await?;

    let bytes = form
        .file
        .ok_or_else(|| AppError::Validation("missing file field".to_string()))?;
    let cv_text = extract_text(&bytes);
    if cv_text.is_empty() {
        return Err(AppError::Validation(
            "no CV text found in upload".to_string(),
        ));
    }

    let scores = state.scorer.score(&cv_text, &form.job_description).await?;

    let (ai_summary, ai_warning) = if form.use_ai {
        match summarize(state.llm.as_ref(), &cv_text, form.model.as_deref()).await {
            Ok(summary) => (Some(summary), None),
            Err(e) => {
                warn!("AI summary failed: {e}");
                (None, Some(e.to_string()))
            }
        }
    } else {
        (None, None)
    };

    let record = assemble(&cv_text, &form.job_description, scores, ai_summary);
    let download =
        download_link(&record, form.filename.as_deref()).map_err(|e| AppError::Internal(e.into()))?;

    let webhook = match (form.post_webhook, form.webhook_url.as_deref()) {
        (true, Some(url)) => Some(match state.webhook.deliver(url, &record).await {
            Ok(()) => WebhookOutcome {
                delivered: true,
                detail: format!("posted to {url}"),
            },
            Err(e) => {
                warn!("webhook delivery failed: {e}");
                WebhookOutcome {
                    delivered: false,
                    detail: e.to_string(),
                }
            }
        }),
        _ => None,
    };

    Ok(Json(AnalyzeResponse {
        record,
        download,
        ai_warning,
        webhook,
    }))
}

/// GET /api/v1/example
///
/// Returns the built-in example CV text.
pub async fn handle_example() -> Json<ExtractResponse> {
    Json(ExtractResponse {
        cv_text: EXAMPLE_CV.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart form plumbing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AnalyzeForm {
    file: Option<Vec<u8>>,
    job_description: String,
    use_ai: bool,
    post_webhook: bool,
    webhook_url: Option<String>,
    model: Option<String>,
    filename: Option<String>,
}

async fn read_analyze_form(multipart: &mut Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => form.file = Some(field.bytes().await.map_err(bad_multipart)?.to_vec()),
            "job_description" => {
                form.job_description = field.text().await.map_err(bad_multipart)?;
            }
            "use_ai" => form.use_ai = parse_flag(&field.text().await.map_err(bad_multipart)?),
            "post_webhook" => {
                form.post_webhook = parse_flag(&field.text().await.map_err(bad_multipart)?);
            }
            "webhook_url" => {
                form.webhook_url = non_empty(field.text().await.map_err(bad_multipart)?);
            }
            "model" => form.model = non_empty(field.text().await.map_err(bad_multipart)?),
            "filename" => form.filename = non_empty(field.text().await.map_err(bad_multipart)?),
            _ => {}
        }
    }
    Ok(form)
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart request: {e}"))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1" | "on" | "yes")
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_truthy_values() {
        for value in ["true", "1", "on", "yes", " true "] {
            assert!(parse_flag(value), "{value:?} should be truthy");
        }
        for value in ["false", "0", "off", "", "maybe"] {
            assert!(!parse_flag(value), "{value:?} should be falsy");
        }
    }

    #[test]
    fn test_non_empty_drops_blank_strings() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(
            non_empty("https://hooks.example".to_string()),
            Some("https://hooks.example".to_string())
        );
    }

    #[test]
    fn test_example_cv_scores_predictably() {
        use crate::analysis::scoring::compute_heuristic_score;
        let result = compute_heuristic_score(EXAMPLE_CV, "");
        // 6 years +18, five skill hits +30, bachelor +8, awarded +10
        assert_eq!(result.overall, 66);
    }
}
