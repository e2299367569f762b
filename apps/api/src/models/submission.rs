use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

/// Resume form payload received by `POST /ask`.
///
/// Every field is optional on the wire; `validate` enforces the required trio.
/// No normalization is applied: values flow to persistence and prompts as sent.
/// Numeric and boolean JSON values are accepted and kept as their text form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Submission {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub college: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub skills: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub projects: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub achievements: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company: Option<String>,
}

impl Submission {
    /// Fails with `MissingRequiredField` if name, email or skills is absent or empty.
    /// Presence is the only check; whitespace counts as a value.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [&self.name, &self.email, &self.skills];
        if required.iter().any(|field| is_blank(field.as_deref())) {
            return Err(AppError::MissingRequiredField);
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// A submission stamped with its server-side creation time, written once.
#[derive(Debug, Clone, Serialize)]
pub struct PersistedRecord {
    #[serde(flatten)]
    pub submission: Submission,
    pub created_at: DateTime<Utc>,
}

impl PersistedRecord {
    pub fn stamp(submission: Submission) -> Self {
        Self {
            submission,
            created_at: Utc::now(),
        }
    }
}
