//! Request and response envelopes for the dashboard API.
//!
//! Domain records themselves live in `leadgen-core`; this module only holds
//! the wrappers the HTTP layer adds around them.

use leadgen_core::{BusinessId, TemplateSet};
use serde::{Deserialize, Serialize};

/// `GET /templates`, `POST /templates/generate` and `POST /templates/regenerate`
/// all answer with `{ "templates": [...], "total": n }`.
#[derive(Debug, Deserialize)]
pub struct TemplateListResponse {
    pub templates: TemplateSet,
    #[serde(default)]
    pub total: Option<usize>,
}

/// Body for generate and regenerate. The server accepts 1..=3.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub num_variants: u32,
}

/// Body for `POST /api/evaluations`.
#[derive(Debug, Serialize)]
pub struct EvaluationRequest {
    pub business_id: BusinessId,
}

/// Error bodies come in two shapes: FastAPI-style `{"detail": "..."}` from
/// plain HTTP exceptions and `{"error": {"code", "message"}}` from the
/// structured handlers. `detail` can also be a validation list, which carries
/// no single message and is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extracts a human-readable message, preferring the structured shape.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        let structured = self
            .error
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty());
        structured.or_else(|| match self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }
}
