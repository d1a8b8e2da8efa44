use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::score::{is_qualified_lead, ScoreBand};

pub type BusinessId = Uuid;

/// A business record as served by the dashboard API.
///
/// The client never writes these; it holds a read-only copy per view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    /// Aggregate quality score in `[0, 100]`, or `None` before the first evaluation.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_evaluation: bool,
    #[serde(default)]
    pub has_template: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Business {
    #[must_use]
    pub fn is_qualified_lead(&self) -> bool {
        is_qualified_lead(self.score)
    }

    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::classify(self.score)
    }

    /// Score formatted for display, `"—"` when unscored.
    #[must_use]
    pub fn score_label(&self) -> String {
        self.score
            .map_or_else(|| "—".to_string(), |s| format!("{s:.0}"))
    }
}

/// Latest website evaluation for a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub business_id: BusinessId,
    /// Fraction in `[0, 1]`.
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub seo_score: Option<f64>,
    #[serde(default)]
    pub accessibility_score: Option<f64>,
    /// Aggregate in `[0, 100]`.
    pub aggregate_score: f64,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    /// Sub-scores as `(label, percent)` pairs, ready for display.
    #[must_use]
    pub fn sub_scores(&self) -> [(&'static str, Option<u32>); 3] {
        [
            ("performance", as_percent(self.performance_score)),
            ("seo", as_percent(self.seo_score)),
            ("accessibility", as_percent(self.accessibility_score)),
        ]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_percent(fraction: Option<f64>) -> Option<u32> {
    fraction
        .filter(|f| f.is_finite())
        .map(|f| (f.clamp(0.0, 1.0) * 100.0).round() as u32)
}
