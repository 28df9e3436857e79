//! Paper analysis records
//!
//! `RawAnalysis` is what the model sends back: every field optional, decoded
//! leniently. `AnalysisRecord` is what the rest of the crate reads: every
//! field populated, filled in one place by [`AnalysisRecord::from_raw`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Research Implementation";
pub const DEFAULT_AUTHORS: &str = "Not specified";
pub const DEFAULT_ABSTRACT: &str = "No abstract available";
pub const DEFAULT_DOMAIN: &str = "Computer Science";
pub const DEFAULT_RESEARCH_TYPE: &str = "Research Paper";
pub const DEFAULT_YEAR: &str = "Unknown";
pub const DEFAULT_COMPLEXITY: &str = "Intermediate";

/// Analysis as decoded from the wire
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub authors: Option<String>,
    #[serde(default, rename = "abstract", deserialize_with = "lenient_text")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub research_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub complexity: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub key_concepts: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub methodologies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_requirements")]
    pub technical_requirements: Option<RawTechnicalRequirements>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub applications: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub challenges: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub future_work: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTechnicalRequirements {
    #[serde(default, deserialize_with = "lenient_list")]
    pub programming_languages: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub frameworks: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub hardware: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub datasets: Option<Vec<String>>,
}

/// Fully populated analysis of one paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub domain: String,
    pub research_type: String,
    pub year: String,
    pub complexity: String,
    pub key_concepts: Vec<String>,
    pub methodologies: Vec<String>,
    pub technical_requirements: TechnicalRequirements,
    pub applications: Vec<String>,
    pub challenges: Vec<String>,
    pub future_work: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalRequirements {
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub hardware: Vec<String>,
    pub datasets: Vec<String>,
}

impl From<RawTechnicalRequirements> for TechnicalRequirements {
    fn from(raw: RawTechnicalRequirements) -> Self {
        Self {
            programming_languages: raw.programming_languages.unwrap_or_default(),
            frameworks: raw.frameworks.unwrap_or_default(),
            hardware: raw.hardware.unwrap_or_default(),
            datasets: raw.datasets.unwrap_or_default(),
        }
    }
}

impl AnalysisRecord {
    /// Fill every absent field with its default
    pub fn from_raw(raw: RawAnalysis) -> Self {
        debug!(has_title = raw.title.is_some(), "AnalysisRecord::from_raw: called");
        Self {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            authors: raw.authors.unwrap_or_else(|| DEFAULT_AUTHORS.to_string()),
            abstract_text: raw.abstract_text.unwrap_or_else(|| DEFAULT_ABSTRACT.to_string()),
            domain: raw.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            research_type: raw.research_type.unwrap_or_else(|| DEFAULT_RESEARCH_TYPE.to_string()),
            year: raw.year.unwrap_or_else(|| DEFAULT_YEAR.to_string()),
            complexity: raw.complexity.unwrap_or_else(|| DEFAULT_COMPLEXITY.to_string()),
            key_concepts: raw.key_concepts.unwrap_or_default(),
            methodologies: raw.methodologies.unwrap_or_default(),
            technical_requirements: raw.technical_requirements.map(Into::into).unwrap_or_default(),
            applications: raw.applications.unwrap_or_default(),
            challenges: raw.challenges.unwrap_or_default(),
            future_work: raw.future_work.unwrap_or_default(),
        }
    }

    /// Decode a JSON document leniently and default-fill it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        debug!(json_len = json.len(), "AnalysisRecord::from_json: called");
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Default-fill an already decoded value; anything but a JSON object is rejected
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        debug!("AnalysisRecord::from_value: called");
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom("analysis must be a JSON object"));
        }
        serde_json::from_value::<RawAnalysis>(value).map(Self::from_raw)
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(items.into_iter().filter_map(value_to_text).collect::<Vec<_>>().join(", ")),
        other => Some(other.to_string()),
    }
}

fn value_to_item(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(value_to_item).collect()),
        Some(other) => value_to_item(other).map(|item| vec![item]),
    };
    Ok(list)
}

fn lenient_requirements<'de, D>(deserializer: D) -> Result<Option<RawTechnicalRequirements>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}
