//! Request validation.
//!
//! Validation runs before any service logic and collects *every* violated field of
//! a request, so a client sees all problems in a single response.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::user::UserRequest;

pub const SURROUNDING_WHITESPACE_MESSAGE: &str =
    "field cannot have whitespace at the beginning or end";
pub const BLANK_MESSAGE: &str = "must not be blank";

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field_name: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldViolation>),
}

impl ValidationResult {
    fn from_violations(violations: Vec<FieldViolation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(violations) => Err(DomainError::Validation(violations)),
        }
    }
}

/// `true` iff the value equals itself with leading/trailing whitespace removed.
///
/// Absent values pass: presence is checked separately.
pub fn no_surrounding_whitespace(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim() == v)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Validate a create request: every field required, `name` must be trimmed.
pub fn validate_create(request: &UserRequest) -> ValidationResult {
    let mut violations = Vec::new();

    let name = request.name.as_deref();
    if is_blank(name) {
        violations.push(FieldViolation::new("name", BLANK_MESSAGE));
    } else if !no_surrounding_whitespace(name) {
        violations.push(FieldViolation::new("name", SURROUNDING_WHITESPACE_MESSAGE));
    }
    if is_blank(request.email.as_deref()) {
        violations.push(FieldViolation::new("email", BLANK_MESSAGE));
    }
    if is_blank(request.password.as_deref()) {
        violations.push(FieldViolation::new("password", BLANK_MESSAGE));
    }

    ValidationResult::from_violations(violations)
}

/// Validate a partial update: omitted fields are fine, present fields must not be
/// blank and a present `name` must be trimmed.
pub fn validate_update(request: &UserRequest) -> ValidationResult {
    let mut violations = Vec::new();

    let name = request.name.as_deref();
    if name.is_some() && is_blank(name) {
        violations.push(FieldViolation::new("name", BLANK_MESSAGE));
    } else if !no_surrounding_whitespace(name) {
        violations.push(FieldViolation::new("name", SURROUNDING_WHITESPACE_MESSAGE));
    }
    for (field, value) in [("email", &request.email), ("password", &request.password)] {
        let value = value.as_deref();
        if value.is_some() && is_blank(value) {
            violations.push(FieldViolation::new(field, BLANK_MESSAGE));
        }
    }

    ValidationResult::from_violations(violations)
}
