//! Quality gate output model, attached to the posting record for reporting.

use serde::{Deserialize, Serialize};

/// Qualitative tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Strong,
    Good,
    Fair,
    Weak,
}

impl QualityTier {
    pub fn from_score(overall: u8) -> Self {
        match overall {
            80..=u8::MAX => QualityTier::Strong,
            70..=79 => QualityTier::Good,
            60..=69 => QualityTier::Fair,
            _ => QualityTier::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Strong => "strong",
            QualityTier::Good => "good",
            QualityTier::Fair => "fair",
            QualityTier::Weak => "weak",
        }
    }
}

/// Computed once per compiled artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    /// 0–100, `round(0.7 * keyword_match_pct + 0.3 * format_score)`.
    pub overall: u8,
    pub keyword_match_pct: f64,
    pub matched_keywords: Vec<String>,
    /// Top 10 only — enough for a diagnostic without dumping the vocabulary.
    pub missing_keywords: Vec<String>,
    pub tier: QualityTier,
    pub should_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(QualityTier::from_score(100), QualityTier::Strong);
        assert_eq!(QualityTier::from_score(80), QualityTier::Strong);
        assert_eq!(QualityTier::from_score(79), QualityTier::Good);
        assert_eq!(QualityTier::from_score(70), QualityTier::Good);
        assert_eq!(QualityTier::from_score(69), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(60), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(59), QualityTier::Weak);
        assert_eq!(QualityTier::from_score(0), QualityTier::Weak);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&QualityTier::Strong).unwrap(),
            r#""strong""#
        );
    }
}
