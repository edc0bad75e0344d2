//! # Error Types
//!
//! Domain-specific error types for bizdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizdesk-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Every field violation of one schema pass       │
//! │      └── FieldViolation { field, message }                             │
//! │                                                                         │
//! │  Request layer (external)                                              │
//! │  └── maps CoreError::status_hint() to 400 / 500 responses              │
//! │                                                                         │
//! │  Flow: FieldViolation* → ValidationError → CoreError → HTTP response   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Violations are data (`field` + `message`), serializable as-is
//! 3. Arithmetic never fails, so it has no error variants

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input record failed its schema (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A string did not name any member of a closed enum.
    ///
    /// ## When This Occurs
    /// - `"paid".parse::<InvoiceStatus>()` (members are case-sensitive)
    /// - CLI arguments naming an unknown status or entity kind
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// A date string could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A validated record could not be converted to its typed form.
    ///
    /// This indicates a schema/struct mismatch inside this crate, not bad input.
    #[error("Malformed {entity} record: {reason}")]
    Malformed { entity: String, reason: String },
}

impl CoreError {
    /// HTTP status class the request layer should answer with.
    ///
    /// ```text
    /// Validation / UnknownVariant / InvalidDate  → 400 (caller can fix input)
    /// Malformed                                  → 500 (opaque failure)
    /// ```
    pub fn status_hint(&self) -> u16 {
        match self {
            CoreError::Validation(_)
            | CoreError::UnknownVariant { .. }
            | CoreError::InvalidDate(_) => 400,
            CoreError::Malformed { .. } => 500,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// One violated field constraint.
///
/// Nested fields are path-qualified, e.g. `items[1].quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Input validation failure.
///
/// Carries every violation found in one schema pass, in schema field order.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[error("{}", summarize(.violations))]
#[ts(export)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Builds an error from accumulated violations.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(ValidationError { violations })
        }
    }

    /// Builds an error with a single violation.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            violations: vec![FieldViolation::new(field, message)],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }

    /// Field names in report order (duplicates kept).
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    /// First message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError::from_violations(vec![
            FieldViolation::new("name", "Name is required"),
            FieldViolation::new("email", "Invalid email"),
        ])
        .unwrap();

        assert_eq!(err.len(), 2);
        assert_eq!(
            err.to_string(),
            "name: Name is required; email: Invalid email"
        );
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["name", "email"]);
        assert_eq!(err.message_for("email"), Some("Invalid email"));
    }

    #[test]
    fn test_empty_violations_are_not_an_error() {
        assert!(ValidationError::from_violations(Vec::new()).is_none());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::single("name", "Name is required").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.status_hint(), 400);
        assert_eq!(
            core_err.to_string(),
            "Validation error: name: Name is required"
        );
    }

    #[test]
    fn test_malformed_maps_to_server_error() {
        let err = CoreError::Malformed {
            entity: "Invoice".to_string(),
            reason: "missing field `items`".to_string(),
        };
        assert_eq!(err.status_hint(), 500);
    }

    #[test]
    fn test_violations_serialize_as_field_message_pairs() {
        let err = ValidationError::single("items", "At least one item is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "violations": [{ "field": "items", "message": "At least one item is required" }]
            })
        );
    }
}
