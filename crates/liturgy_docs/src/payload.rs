//! Request payload: the JSON description of a bilingual liturgy.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level fields a request must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 2] = ["subtitle", "sections"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiturgyRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub subtitle: String,
    #[serde(default)]
    pub filename: Option<String>,
    pub sections: Vec<Section>,
}

/// A named unit with parallel Latin and Slovenian content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latin: LocalizedBlock,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slovenian: LocalizedBlock,
}

/// Reference citation and body text for one language of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedBlock {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl LocalizedBlock {
    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn has_reference(&self) -> bool {
        !self.reference().trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Fields to report back to the client.
    pub fn required(&self) -> Vec<&'static str> {
        match self {
            Self::MissingFields(fields) => fields.clone(),
            Self::Malformed(_) => REQUIRED_FIELDS.to_vec(),
        }
    }
}

/// Check the decoded body for the required fields, then decode it into a
/// typed request.
pub fn validate(value: &Value) -> Result<LiturgyRequest, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::MissingFields(REQUIRED_FIELDS.to_vec()));
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| is_missing(object.get(*field)))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    LiturgyRequest::deserialize(value).map_err(|e| ValidationError::Malformed(e.to_string()))
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl LiturgyRequest {
    /// Title text, if one was supplied and is not blank.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Filename for the `Content-Disposition` header.
    ///
    /// Quotes, backslashes and control characters are stripped so the name
    /// can sit inside a quoted header parameter.
    pub fn attachment_name(&self, default: &str) -> String {
        let cleaned: String = self
            .filename
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !matches!(c, '"' | '\\') && !c.is_control())
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            default.to_string()
        } else {
            cleaned.to_string()
        }
    }
}
