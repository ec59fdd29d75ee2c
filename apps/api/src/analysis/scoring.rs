//! Heuristic CV scoring — fixed keyword and pattern rules, no trained model.
//!
//! Default: `HeuristicScorer` (pure-Rust, deterministic, fully testable).
//! `AppState` holds an `Arc<dyn CvScorer>` so a semantic backend can be
//! swapped in at startup without touching handlers.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Skill keywords counted by the skill signal. Each keyword contributes at
/// most one hit regardless of how often it appears in the text.
pub const SKILL_KEYWORDS: [&str; 10] = [
    "python",
    "sql",
    "excel",
    "hr",
    "recruit",
    "communication",
    "aws",
    "nlp",
    "pandas",
    "javascript",
];

const POSTGRAD_MARKERS: [&str; 2] = ["master", "msc"];
const UNDERGRAD_MARKERS: [&str; 2] = ["bachelor", "bsc"];
const ACHIEVEMENT_MARKERS: [&str; 3] = ["award", "published", "patent"];

// ASCII digits only: the captured run must parse as an integer.
static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\s+years?").unwrap());

/// Bounded score plus the reasons that produced it, in signal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall: u32, // 0 – 100
    pub details: Vec<String>,
}

/// The scorer trait. Implement this to swap backends without touching the
/// endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn CvScorer>`.
#[async_trait]
pub trait CvScorer: Send + Sync {
    async fn score(&self, cv_text: &str, job_description: &str) -> Result<ScoreResult, AppError>;
}

/// Pure-Rust keyword/pattern scorer. Fast, deterministic, no LLM call.
pub struct HeuristicScorer;

#[async_trait]
impl CvScorer for HeuristicScorer {
    async fn score(&self, cv_text: &str, job_description: &str) -> Result<ScoreResult, AppError> {
        Ok(compute_heuristic_score(cv_text, job_description))
    }
}

/// Computes the heuristic score. Pure: identical inputs always yield
/// identical output; no I/O, no hidden state.
///
/// `_job_description` is accepted but does not affect the score. JD-matching
/// looks like an unfinished feature upstream; the current behavior is kept
/// rather than silently invented.
pub fn compute_heuristic_score(cv_text: &str, _job_description: &str) -> ScoreResult {
    if cv_text.is_empty() {
        return ScoreResult {
            overall: 0,
            details: vec!["No text extracted".to_string()],
        };
    }

    let lowered = cv_text.to_lowercase();
    let mut score: u32 = 0;
    let mut details = Vec::new();

    // Experience: max of all "<n> years" mentions. Integer parse overflow
    // saturates, so absurdly large numbers count as senior instead of
    // crashing.
    let max_years = YEARS_RE
        .captures_iter(&lowered)
        .map(|c| c[1].parse::<u64>().unwrap_or(u64::MAX))
        .max();
    match max_years {
        Some(y) if y >= 8 => {
            score += 30;
            details.push(format!("Experience {y}y (+30)"));
        }
        Some(y) if y >= 3 => {
            score += 18;
            details.push(format!("Experience {y}y (+18)"));
        }
        Some(_) => details.push("Limited experience (+0)".to_string()),
        None => details.push("No experience signal (+0)".to_string()),
    }

    // Skills: case-insensitive substring containment, one hit per keyword.
    let hits = SKILL_KEYWORDS
        .iter()
        .filter(|k| lowered.contains(*k))
        .count() as u32;
    let skill_points = (hits * 6).min(35);
    score += skill_points;
    details.push(format!("Skill hits: {hits} (+{skill_points})"));

    // Education: postgraduate outranks undergraduate; at most one fires.
    if POSTGRAD_MARKERS.iter().any(|m| lowered.contains(m)) {
        score += 15;
        details.push("Masters (+15)".to_string());
    } else if UNDERGRAD_MARKERS.iter().any(|m| lowered.contains(m)) {
        score += 8;
        details.push("Bachelor (+8)".to_string());
    }

    if ACHIEVEMENT_MARKERS.iter().any(|m| lowered.contains(m)) {
        score += 10;
        details.push("Achievements (+10)".to_string());
    }

    ScoreResult {
        overall: score.min(100),
        details,
    }
}
