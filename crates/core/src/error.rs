//! Domain error type shared across the workspace.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field-level validation errors: field name -> list of messages.
///
/// Ordered (BTreeMap) so serialized payloads and error messages are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map with a single field error.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self::new().with(field, message)
    }

    /// Add a message for a field, returning self for chaining.
    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.push(field, message);
        self
    }

    /// Add a message for a field in place.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Domain-level error. The API layer maps each variant to an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target does not exist -- or is outside the caller's visible set.
    /// The two cases are deliberately indistinguishable.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A single-message validation failure.
    #[error("{0}")]
    Validation(String),

    /// Field-level validation failures (field -> messages).
    #[error("{0}")]
    InvalidFields(FieldErrors),

    /// A uniqueness conflict not covered by a domain-specific rule.
    #[error("{0}")]
    Conflict(String),

    /// No valid principal (missing/invalid credentials or token).
    #[error("{0}")]
    Unauthorized(String),

    /// The principal is known and the target visible, but the action is denied.
    #[error("{0}")]
    Forbidden(String),

    /// An internal invariant failed; details belong in logs, not responses.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a single field-level validation error.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidFields(FieldErrors::single(field, message))
    }
}
