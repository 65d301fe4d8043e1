//! Quality Gate — scores a compiled artifact against the job description and
//! decides accept/reject before publication.
//!
//! Keyword scoring reuses the Relevance Scorer, so the gate's numbers are
//! comparable with the selection stage. A format heuristic covers what
//! keywords cannot: implausible length and missing section labels.

use tracing::warn;

use crate::models::quality::{QualityScore, QualityTier};
use crate::scoring::{extract_keywords, score_text};

/// Extracted text shorter than this loses the "too short" penalty points.
const SHORT_TEXT_CHARS: usize = 1_500;
const SHORT_TEXT_PENALTY: i32 = 30;
/// A one-page resume does not extract to this much text.
const LONG_TEXT_CHARS: usize = 8_000;
const LONG_TEXT_PENALTY: i32 = 20;
/// Section labels an ATS-readable resume is expected to carry.
const EXPECTED_SECTIONS: [&str; 3] = ["education", "experience", "skills"];
const MISSING_SECTION_PENALTY: i32 = 15;
/// Missing-keyword diagnostics are capped at this many entries.
const MISSING_KEYWORDS_SHOWN: usize = 10;

const KEYWORD_WEIGHT: f64 = 0.7;
const FORMAT_WEIGHT: f64 = 0.3;

/// Plain text of the compiled artifact. Extraction failure degrades to an
/// empty string — an unreadable PDF must never abort the pipeline run.
pub fn extract_artifact_text(pdf: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(pdf) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF text extraction failed: {e}");
            String::new()
        }
    }
}

/// Scores the artifact text against the job description.
///
/// If either input is empty the upstream extraction failed; the gate returns
/// a zero score but `should_submit = true` — unknown quality degrades to
/// "proceed", it never silently blocks a run.
pub fn score_artifact(artifact_text: &str, job_description: &str, threshold: u8) -> QualityScore {
    if artifact_text.trim().is_empty() || job_description.trim().is_empty() {
        return QualityScore {
            overall: 0,
            keyword_match_pct: 0.0,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            tier: QualityTier::Weak,
            should_submit: true,
        };
    }

    let keywords = extract_keywords(job_description);
    let text_score = score_text(artifact_text, &keywords);
    let format = format_score(artifact_text);

    let overall = (KEYWORD_WEIGHT * text_score.match_pct + FORMAT_WEIGHT * f64::from(format))
        .round()
        .clamp(0.0, 100.0) as u8;

    let mut missing = text_score.missing;
    missing.truncate(MISSING_KEYWORDS_SHOWN);

    QualityScore {
        overall,
        keyword_match_pct: text_score.match_pct,
        matched_keywords: text_score.matched,
        missing_keywords: missing,
        tier: QualityTier::from_score(overall),
        should_submit: overall >= threshold,
    }
}

/// Length and section-label heuristic, 0–100.
fn format_score(text: &str) -> i32 {
    let mut score = 100;
    if text.len() < SHORT_TEXT_CHARS {
        score -= SHORT_TEXT_PENALTY;
    } else if text.len() > LONG_TEXT_CHARS {
        score -= LONG_TEXT_PENALTY;
    }
    let lower = text.to_lowercase();
    for section in EXPECTED_SECTIONS {
        if !lower.contains(section) {
            score -= MISSING_SECTION_PENALTY;
        }
    }
    score.max(0)
}
