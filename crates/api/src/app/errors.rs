//! Consistent error responses.
//!
//! | Failure | Status | `error` | `message` |
//! |---|---|---|---|
//! | validation | 400 | `Validation error` | `Error on validation attributes` + `errors[]` |
//! | duplicate key | 400 | `Bad Request` | `E-mail already registered` / `Dup key exception` |
//! | not found | 404 | `Not Found` | service message |
//! | malformed body | 400 | `Bad Request` | rejection text |
//! | anything else | 500 | `Internal Server Error` | generic text, details only logged |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use userhub_core::{DomainError, FieldViolation};

pub const VALIDATION_ERROR: &str = "Validation error";
pub const VALIDATION_MESSAGE: &str = "Error on validation attributes";
pub const EMAIL_ALREADY_REGISTERED: &str = "E-mail already registered";
pub const DUP_KEY_EXCEPTION: &str = "Dup key exception";
const INTERNAL_MESSAGE: &str = "Unexpected error while processing the request";

/// Error payload for every failure except validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// Error payload for rejected request fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub errors: Vec<FieldViolation>,
}

impl StandardError {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: reason_phrase(status).to_string(),
            message: message.into(),
            path: path.into(),
        }
    }
}

impl IntoResponse for StandardError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl ValidationError {
    pub fn new(errors: Vec<FieldViolation>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.into(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            error: VALIDATION_ERROR.to_string(),
            message: VALIDATION_MESSAGE.to_string(),
            errors,
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Pick the client-facing message for a uniqueness conflict.
pub fn verify_dup_key(conflict: &str) -> &'static str {
    if conflict.to_lowercase().contains("email") {
        EMAIL_ALREADY_REGISTERED
    } else {
        DUP_KEY_EXCEPTION
    }
}

pub fn domain_error_to_response(err: DomainError, path: &str) -> Response {
    match err {
        DomainError::Validation(errors) => ValidationError::new(errors, path).into_response(),
        DomainError::DuplicateKey(conflict) => {
            StandardError::new(StatusCode::BAD_REQUEST, verify_dup_key(&conflict), path)
                .into_response()
        }
        DomainError::NotFound(msg) => {
            StandardError::new(StatusCode::NOT_FOUND, msg, path).into_response()
        }
        DomainError::Store(msg) => {
            tracing::error!(%path, error = %msg, "store failure");
            StandardError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE, path)
                .into_response()
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection, path: &str) -> Response {
    StandardError::new(StatusCode::BAD_REQUEST, rejection.body_text(), path).into_response()
}
