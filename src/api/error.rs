use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use super::types::ItemId;

/// Message used when an error body carries nothing usable
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Per-field validation messages, one per field
pub type FieldErrors = BTreeMap<String, String>;

static NO_FIELD_ERRORS: FieldErrors = BTreeMap::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
  /// The server rejected one or more fields
  #[error("Please fix the highlighted fields.")]
  Validation { status: u16, fields: FieldErrors },

  /// Any other non-2xx response
  #[error("{message}")]
  Request { status: u16, message: String },

  #[error("Network error: {0}")]
  Network(String),

  #[error("Invalid response: {0}")]
  InvalidResponse(String),

  /// Local precondition: the item is no longer in the cache
  #[error("Item not found")]
  ItemNotFound(ItemId),
}

impl ApiError {
  /// Field-level messages. Empty for every failure but `Validation`.
  pub fn field_errors(&self) -> &FieldErrors {
    match self {
      ApiError::Validation { fields, .. } => fields,
      _ => &NO_FIELD_ERRORS,
    }
  }

  /// Whether this failure belongs next to a form control rather than in the banner
  pub fn is_validation(&self) -> bool {
    matches!(self, ApiError::Validation { .. })
  }

  /// Build the failure for a non-2xx response
  pub fn from_status(status: u16, body: &Value) -> Self {
    match ErrorBody::classify(body) {
      ErrorBody::Fields(fields) => ApiError::Validation { status, fields },
      ErrorBody::General(message) => ApiError::Request { status, message },
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    ApiError::Network(err.to_string())
  }
}

/// The two shapes an error body can take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
  /// `{field: [messages...]}`
  Fields(FieldErrors),
  /// `{detail: msg}` or `{error: msg}`, or nothing usable
  General(String),
}

impl ErrorBody {
  pub fn classify(body: &Value) -> Self {
    let fields = parse_field_errors(body);
    if !fields.is_empty() {
      return ErrorBody::Fields(fields);
    }

    let message = ["detail", "error"]
      .iter()
      .find_map(|key| body.get(key).and_then(truthy_message))
      .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    ErrorBody::General(message)
  }
}

/// Take the first message of every field whose value is a non-empty array
fn parse_field_errors(body: &Value) -> FieldErrors {
  let Some(object) = body.as_object() else {
    return FieldErrors::new();
  };

  object
    .iter()
    .filter_map(|(field, value)| {
      let first = value.as_array()?.first()?;
      Some((field.clone(), display_value(first)))
    })
    .collect()
}

/// Render a message value, skipping the ones that carry nothing
fn truthy_message(value: &Value) -> Option<String> {
  match value {
    Value::Null | Value::Bool(false) => None,
    Value::String(s) if s.is_empty() => None,
    Value::Number(n) if n.as_f64() == Some(0.0) => None,
    other => Some(display_value(other)),
  }
}

fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
