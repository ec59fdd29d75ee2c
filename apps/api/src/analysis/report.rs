//! Result assembly — combines extraction output, score, and the optional AI
//! summary into the record handed back to the caller and offered as a
//! download. The record is a plain return value; the service keeps no copy
//! between runs.

use base64::{engine::general_purpose, Engine as _};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::scoring::ScoreResult;
use crate::text::truncate_chars;

/// Upper bound on the excerpt retained for display/export, in characters.
pub const CV_EXCERPT_MAX_CHARS: usize = 2000;

pub const DEFAULT_DOWNLOAD_FILENAME: &str = "result.json";

/// One run's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// ISO-8601 UTC with trailing "Z".
    pub timestamp: String,
    pub job_description: String,
    pub scores: ScoreResult,
    pub ai_summary: Option<String>,
    /// Prefix of the extracted text, at most `CV_EXCERPT_MAX_CHARS` characters.
    pub cv_excerpt: String,
}

/// The serialized record as a downloadable data URI.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadLink {
    pub filename: String,
    pub href: String,
}

pub fn assemble(
    cv_text: &str,
    job_description: &str,
    scores: ScoreResult,
    ai_summary: Option<String>,
) -> ResultRecord {
    ResultRecord {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        job_description: job_description.to_string(),
        scores,
        ai_summary,
        cv_excerpt: truncate_chars(cv_text, CV_EXCERPT_MAX_CHARS).to_string(),
    }
}

/// Renders the record as indented JSON, base64-embedded in a data URI so
/// clients can offer it as a file download without a storage round trip.
pub fn download_link(
    record: &ResultRecord,
    filename: Option<&str>,
) -> Result<DownloadLink, serde_json::Error> {
    let json = serde_json::to_string_pretty(record)?;
    let encoded = general_purpose::STANDARD.encode(json.as_bytes());
    Ok(DownloadLink {
        filename: filename.unwrap_or(DEFAULT_DOWNLOAD_FILENAME).to_string(),
        href: format!("data:application/json;base64,{encoded}"),
    })
}
