//! Score gate: decides which businesses count as qualified leads.
//!
//! Every AI-preview affordance, and the "qualified lead" callout, is gated on
//! [`is_qualified_lead`]. Card and detail presentations both call this one
//! predicate rather than re-deriving the threshold.

use serde::{Deserialize, Serialize};

/// Scores strictly below this value qualify a business as a lead.
pub const QUALIFIED_LEAD_THRESHOLD: f64 = 70.0;

/// Scores at or above this value fall into the high band.
pub const HIGH_SCORE_THRESHOLD: f64 = 85.0;

/// Returns `true` when the score is known and below [`QUALIFIED_LEAD_THRESHOLD`].
///
/// An unscored business (`None`) never qualifies. `NaN` never qualifies either.
#[must_use]
pub fn is_qualified_lead(score: Option<f64>) -> bool {
    matches!(score, Some(s) if s < QUALIFIED_LEAD_THRESHOLD)
}

/// Three-band display classification, plus a neutral band for unscored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Neutral,
    Low,
    Medium,
    High,
}

/// Display lookup shared by every presentation of a score.
const BAND_STYLES: [(ScoreBand, &str, &str); 4] = [
    (ScoreBand::Neutral, "gray", "not scored"),
    (ScoreBand::Low, "red", "needs work"),
    (ScoreBand::Medium, "yellow", "fair"),
    (ScoreBand::High, "green", "good"),
];

impl ScoreBand {
    /// Classifies a score into its display band.
    #[must_use]
    pub fn classify(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::Neutral,
            Some(s) if s < QUALIFIED_LEAD_THRESHOLD => ScoreBand::Low,
            Some(s) if s < HIGH_SCORE_THRESHOLD => ScoreBand::Medium,
            Some(s) if s >= HIGH_SCORE_THRESHOLD => ScoreBand::High,
            // NaN compares false against everything.
            Some(_) => ScoreBand::Neutral,
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        Self::style(self).1
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        Self::style(self).2
    }

    fn style(band: Self) -> (ScoreBand, &'static str, &'static str) {
        BAND_STYLES
            .iter()
            .copied()
            .find(|(b, _, _)| *b == band)
            .unwrap_or(BAND_STYLES[0])
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreBand::Neutral => write!(f, "neutral"),
            ScoreBand::Low => write!(f, "low"),
            ScoreBand::Medium => write!(f, "medium"),
            ScoreBand::High => write!(f, "high"),
        }
    }
}
