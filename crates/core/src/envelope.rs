//! Error envelope returned by the campaign API on non-2xx responses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field name -> validation messages for that field, in the order the fields
/// were reported.
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Top-level error string used for field validation failures.
pub const VALIDATION_ERROR: &str = "Validation error";

/// `{ error, messages? }` as sent by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<FieldErrors>,
}

impl ApiErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            messages: None,
        }
    }

    pub fn validation(messages: FieldErrors) -> Self {
        Self {
            error: VALIDATION_ERROR.to_string(),
            messages: Some(messages),
        }
    }

    /// Operator-facing rendering of the envelope.
    pub fn format(&self) -> String {
        format_api_error(&self.error, self.messages.as_ref())
    }
}

impl fmt::Display for ApiErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// `error` alone, or `"{error} - field1: e1, e2; field2: e3"`.
///
/// An empty `messages` map renders like an absent one.
pub fn format_api_error(error: &str, messages: Option<&FieldErrors>) -> String {
    match messages {
        Some(fields) if !fields.is_empty() => {
            let detail = fields
                .iter()
                .map(|(field, errors)| format!("{field}: {}", errors.join(", ")))
                .collect::<Vec<_>>()
                .join("; ");
            format!("{error} - {detail}")
        }
        _ => error.to_string(),
    }
}
