#![allow(dead_code)]

//! Relevance Scorer — extracts domain keywords from a job description and
//! scores text fragments against them.
//!
//! Invoked twice per job: once to drive content selection, once to gate the
//! compiled artifact. Both call sites share these functions so scores are
//! comparable across stages.

pub mod vocabulary;

use vocabulary::VOCABULARY;

/// Normalized (lower-cased) domain terms extracted from one posting.
/// Rebuilt per job, never persisted. Iteration order follows the vocabulary,
/// so downstream output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from explicit terms (tests and callers that already know
    /// the keywords). Terms are lowercased.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordSet {
            terms: terms.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.terms.iter().any(|t| *t == term)
    }
}

/// Result of scoring one text fragment against a keyword set.
#[derive(Debug, Clone)]
pub struct TextScore {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// matched / total keywords, in percent. An empty requirement set is
    /// trivially satisfied: 100, never a total mismatch.
    pub match_pct: f64,
}

/// Scans the curated vocabulary and returns every term that appears as a
/// case-insensitive substring of `text`.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let haystack = text.to_lowercase();
    KeywordSet {
        terms: VOCABULARY
            .iter()
            .filter(|term| haystack.contains(*term))
            .map(|term| term.to_string())
            .collect(),
    }
}

/// Partitions `keywords` into matched/missing for `text` and computes the
/// match percentage.
pub fn score_text(text: &str, keywords: &KeywordSet) -> TextScore {
    if keywords.is_empty() {
        return TextScore {
            matched: Vec::new(),
            missing: Vec::new(),
            match_pct: 100.0,
        };
    }

    let haystack = text.to_lowercase();
    let (matched, missing): (Vec<String>, Vec<String>) = keywords
        .iter()
        .map(str::to_string)
        .partition(|kw| haystack.contains(kw.as_str()));

    let match_pct = matched.len() as f64 / keywords.len() as f64 * 100.0;
    TextScore {
        matched,
        missing,
        match_pct,
    }
}

/// Number of keywords appearing as substrings of `text`. The bullet-level
/// scoring primitive used by the Content Selector.
pub fn keyword_hits(text: &str, keywords: &KeywordSet) -> usize {
    let haystack = text.to_lowercase();
    keywords.iter().filter(|kw| haystack.contains(*kw)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_from_requirements_line() {
        let keywords = extract_keywords("React, PostgreSQL, Docker required");
        assert!(keywords.contains("react"));
        assert!(keywords.contains("postgresql"));
        assert!(keywords.contains("docker"));
        assert!(!keywords.contains("rust"));
    }

    #[test]
    fn test_extract_keywords_is_case_insensitive() {
        let keywords = extract_keywords("KUBERNETES and PyTorch experience");
        assert!(keywords.contains("kubernetes"));
        assert!(keywords.contains("pytorch"));
    }

    #[test]
    fn test_extract_keywords_empty_text_yields_empty_set() {
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn test_score_text_empty_keyword_set_is_trivially_satisfied() {
        let score = score_text("anything at all", &KeywordSet::default());
        assert_eq!(score.match_pct, 100.0);
        assert!(score.matched.is_empty());
        assert!(score.missing.is_empty());
    }

    #[test]
    fn test_score_text_partial_match() {
        let keywords = KeywordSet::from_terms(["react", "postgresql", "docker", "kafka"]);
        let score = score_text("Shipped React frontends backed by PostgreSQL", &keywords);
        assert_eq!(score.matched, vec!["react", "postgresql"]);
        assert_eq!(score.missing, vec!["docker", "kafka"]);
        assert!((score.match_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_text_all_missing() {
        let keywords = KeywordSet::from_terms(["kafka"]);
        let score = score_text("nothing relevant here", &keywords);
        assert_eq!(score.match_pct, 0.0);
        assert_eq!(score.missing, vec!["kafka"]);
    }

    #[test]
    fn test_keyword_hits_counts_distinct_keywords() {
        let keywords = KeywordSet::from_terms(["react", "docker", "kafka"]);
        assert_eq!(keyword_hits("React on Docker, more Docker", &keywords), 2);
        assert_eq!(keyword_hits("nothing", &keywords), 0);
    }

    #[test]
    fn test_selection_and_gate_share_extraction_rules() {
        // Same input through extract → score must be internally consistent.
        let jd = "Looking for React and Docker experience";
        let keywords = extract_keywords(jd);
        let score = score_text(jd, &keywords);
        assert_eq!(score.match_pct, 100.0);
        assert!(score.missing.is_empty());
    }
}
