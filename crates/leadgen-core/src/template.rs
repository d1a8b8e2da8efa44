//! AI-generated website templates and the ordered set a business owns.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::business::BusinessId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl Impact {
    /// Case-insensitive; anything outside low/medium/high is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Impact::Low),
            "medium" => Some(Impact::Medium),
            "high" => Some(Impact::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

/// One improvement the generator claims over the business's current site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Absent for records stored in the grouped `{category: [description]}`
    /// shape, and for labels outside the known vocabulary.
    #[serde(default, deserialize_with = "deserialize_impact")]
    pub impact: Option<Impact>,
}

fn default_category() -> String {
    "general".to_string()
}

/// A single generated variant. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub business_id: BusinessId,
    /// 1-based, unique within a business's set.
    pub variant_number: u32,
    pub html_content: String,
    /// Only meaningful when `html_content` is a fragment.
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub css_content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub js_content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_improvements")]
    pub improvements_made: Vec<Improvement>,
    pub generated_at: DateTime<Utc>,
}

/// Ordered collection of a business's templates at one point in time.
///
/// Always sorted by `variant_number`. Not cached across views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    #[must_use]
    pub fn new(mut templates: Vec<Template>) -> Self {
        templates.sort_by_key(|t| t.variant_number);
        Self { templates }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    #[must_use]
    pub fn by_variant(&self, variant_number: u32) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.variant_number == variant_number)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Template] {
        &self.templates
    }

    /// "1 template available" / "3 templates available".
    #[must_use]
    pub fn availability_label(&self) -> String {
        match self.templates.len() {
            1 => "1 template available".to_string(),
            n => format!("{n} templates available"),
        }
    }
}

impl<'de> Deserialize<'de> for TemplateSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<Template>::deserialize(deserializer).map(Self::new)
    }
}

impl<'a> IntoIterator for &'a TemplateSet {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

/// The server stores impact as free text; one unknown label must not sink the
/// whole template.
fn deserialize_impact<'de, D>(deserializer: D) -> Result<Option<Impact>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(Impact::parse))
}

fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Accepts both improvement shapes the API has served: a list of
/// `{category, description, impact}` objects, or a map of category to a list
/// of descriptions. Map entries keep the order the server sent them in.
fn deserialize_improvements<'de, D>(deserializer: D) -> Result<Vec<Improvement>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value::<Improvement>(item).map_err(D::Error::custom))
            .collect(),
        Some(Value::Object(groups)) => {
            let mut out = Vec::new();
            for (category, entries) in groups {
                let descriptions = match entries {
                    Value::Array(list) => list,
                    single @ Value::String(_) => vec![single],
                    _ => continue,
                };
                out.extend(descriptions.into_iter().filter_map(|d| match d {
                    Value::String(description) => Some(Improvement {
                        category: category.clone(),
                        description,
                        impact: None,
                    }),
                    _ => None,
                }));
            }
            Ok(out)
        }
        Some(other) => Err(D::Error::custom(format!(
            "improvements_made must be a list or a map, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
