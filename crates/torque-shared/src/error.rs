use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::schema::FieldKind;

/// A rejected insert payload, with one entry per failing field.
///
/// Violations keep the declaration order of the entity, so the first entry
/// is always the first offending field a form would show.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid payload: {}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Error for a payload that is not a JSON object at all.
    pub fn not_an_object() -> Self {
        Self::new(vec![FieldViolation::new(
            crate::constants::PAYLOAD_FIELD,
            ViolationKind::NotAnObject,
        )])
    }

    /// Names of every field that failed, in declaration order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    /// The violation recorded for `field`, if any.
    pub fn violation_for(&self, field: &str) -> Option<&ViolationKind> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.kind)
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Logical (camelCase) field name as it appears in the payload.
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent from the payload.
    Missing,
    /// Field present but null, and not nullable.
    Null,
    /// Field present with a JSON type the column cannot hold.
    WrongType { expected: FieldKind },
    /// Right type, but the value is malformed (e.g. an email without '@').
    InvalidFormat { reason: &'static str },
    /// The payload was not a JSON object.
    NotAnObject,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "required field is missing"),
            ViolationKind::Null => write!(f, "must not be null"),
            ViolationKind::WrongType { expected } => write!(f, "expected {expected}"),
            ViolationKind::InvalidFormat { reason } => write!(f, "invalid format: {reason}"),
            ViolationKind::NotAnObject => write!(f, "expected a JSON object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_field() {
        let err = ValidationError::new(vec![
            FieldViolation::new("brand", ViolationKind::Missing),
            FieldViolation::new(
                "year",
                ViolationKind::WrongType {
                    expected: FieldKind::Integer,
                },
            ),
        ]);

        assert_eq!(
            err.to_string(),
            "invalid payload: brand: required field is missing; year: expected integer"
        );
        assert_eq!(err.field_names(), vec!["brand", "year"]);
        assert_eq!(err.violation_for("brand"), Some(&ViolationKind::Missing));
        assert_eq!(err.violation_for("model"), None);
    }

    #[test]
    fn test_serializes_for_field_feedback() {
        let err = ValidationError::new(vec![FieldViolation::new(
            "videoUrl",
            ViolationKind::WrongType {
                expected: FieldKind::Text,
            },
        )]);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "violations": [
                    { "field": "videoUrl", "code": "wrong_type", "expected": "text" }
                ]
            })
        );
    }
}
