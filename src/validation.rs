/// Request body validation helpers
///
/// Reads typed fields out of a JSON object while collecting every field-level problem,
/// so a single 400 response can report all of them at once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the offending field; empty when the body itself is malformed
    pub path: Vec<String>,
    /// Human-readable description of the problem
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }

    /// Error about the request body as a whole
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }
}

/// Collects typed fields from a JSON object, accumulating errors
///
/// Unknown keys are ignored, matching how the insert schemas strip extra input.
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    /// Start reading from a request body, which must be a JSON object
    pub fn new(body: &'a Value) -> Result<Self, Vec<FieldError>> {
        match body.as_object() {
            Some(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            None => Err(vec![FieldError::body("Expected object")]),
        }
    }

    /// Required, non-empty string field
    pub fn required_text(&mut self, field: &str) -> Option<String> {
        self.read_string(field, true, true)
    }

    /// Required string field that may be empty
    pub fn required_string(&mut self, field: &str) -> Option<String> {
        self.read_string(field, true, false)
    }

    /// Optional string field which, when present, must be non-empty
    pub fn optional_text(&mut self, field: &str) -> Option<String> {
        self.read_string(field, false, true)
    }

    /// Optional string field that may be empty
    pub fn optional_string(&mut self, field: &str) -> Option<String> {
        self.read_string(field, false, false)
    }

    /// Optional string field that also accepts an explicit `null`
    ///
    /// Returns `None` when absent, `Some(None)` for null and `Some(Some(..))` otherwise.
    pub fn nullable_string(&mut self, field: &str) -> Option<Option<String>> {
        match self.object.get(field)? {
            Value::Null => Some(None),
            Value::String(value) => Some(Some(value.clone())),
            _ => {
                self.errors.push(FieldError::new(field, "Expected string"));
                None
            }
        }
    }

    /// Optional enumerated field parsed through `FromStr`
    pub fn optional_enum<T: FromStr>(&mut self, field: &str, expected: &[&str]) -> Option<T> {
        let value = self.object.get(field)?;
        let parsed = value.as_str().and_then(|raw| raw.parse::<T>().ok());
        if parsed.is_none() {
            let options = expected
                .iter()
                .map(|option| format!("'{}'", option))
                .collect::<Vec<_>>()
                .join(" | ");
            self.errors.push(FieldError::new(
                field,
                format!("Invalid enum value. Expected {}", options),
            ));
        }
        parsed
    }

    /// Finish reading, returning the built value or every collected error
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Vec<FieldError>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        value().ok_or_else(|| vec![FieldError::body("Invalid request body")])
    }

    fn read_string(&mut self, field: &str, required: bool, non_empty: bool) -> Option<String> {
        match self.object.get(field) {
            None if required => {
                self.errors.push(FieldError::new(field, "Required"));
                None
            }
            None => None,
            Some(Value::String(value)) => {
                if non_empty && value.trim().is_empty() {
                    self.errors.push(FieldError::new(field, "Must not be empty"));
                    None
                } else {
                    Some(value.clone())
                }
            }
            Some(Value::Null) if required => {
                self.errors.push(FieldError::new(field, "Required"));
                None
            }
            Some(_) => {
                self.errors.push(FieldError::new(field, "Expected string"));
                None
            }
        }
    }
}
