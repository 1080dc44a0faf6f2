//! Error handling for the template API.
//!
//! Errors map onto HTTP status codes with sanitized bodies: request
//! validation failures carry the full violation list, a missing resource is
//! a 404 with a stable code, and persistence or output-schema failures are
//! logged server-side without leaking internals to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;

use crate::validation::Violation;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - request shape or query translation rejected the
    /// input before persistence was touched
    ValidationFailed {
        /// Every violated rule, not just the first
        violations: Vec<Violation>,
    },

    /// 404 Not Found - the persistence layer returned no record
    NotFound {
        /// Resource type, e.g. "Template"
        resource: String,
    },

    /// 409 Conflict - a uniqueness constraint was violated
    Conflict {
        /// User-facing error message
        message: String,
    },

    /// 500 Internal Server Error - persistence failure (details logged, not
    /// exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to the caller)
        internal: DbErr,
    },

    /// 500 Internal Server Error - a record read back from persistence did
    /// not conform to the output schema. Always a defect, never
    /// caller-recoverable.
    Shape {
        /// Internal description (logged, not sent to the caller)
        internal: String,
    },
}

impl ApiError {
    pub fn validation_failed(violations: Vec<Violation>) -> Self {
        Self::ValidationFailed { violations }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    pub fn shape(internal: impl Into<String>) -> Self {
        Self::Shape {
            internal: internal.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } | Self::Shape { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::ValidationFailed { .. } => "Validation Failed".to_string(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Conflict { message } => message.clone(),
            Self::Database { message, .. } => message.clone(),
            Self::Shape { .. } => "An internal error occurred".to_string(),
        }
    }

    /// Detail entries included in the response body.
    fn details(&self) -> Option<Vec<Violation>> {
        match self {
            Self::ValidationFailed { violations } => Some(violations.clone()),
            Self::NotFound { resource } => Some(vec![Violation::new(
                format!("{resource} not found"),
                format!("{}_NOT_FOUND", resource.to_uppercase()),
            )]),
            _ => None,
        }
    }

    /// Log internal error details. Never sent to the caller.
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "database error occurred");
            }
            Self::Shape { internal } => {
                tracing::error!(details = %internal, "output schema violation");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to callers (sanitized).
#[derive(Serialize)]
struct ErrorResponse {
    /// Error summary
    error: String,
    /// Structured list of violated rules, where applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<Violation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let response = ErrorResponse {
            error: self.user_message(),
            details: self.details(),
        };

        (self.status_code(), Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Persistence failures are propagated unchanged, except that a uniqueness
/// violation surfaces as a conflict the caller can act on.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::conflict("A template with this email already exists")
            }
            _ => Self::database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_is_400_with_all_violations() {
        let err = ApiError::validation_failed(vec![
            Violation::new("Name is required", "NAME_REQUIRED"),
            Violation::new("Email must be a valid email address", "EMAIL_INVALID"),
        ]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details().unwrap().len(), 2);
    }

    #[test]
    fn not_found_carries_resource_code() {
        let err = ApiError::not_found("Template");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Template not found");
        let details = err.details().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].code, "TEMPLATE_NOT_FOUND");
    }

    #[test]
    fn conflict_is_409() {
        let err = ApiError::conflict("A template with this email already exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.details().is_none());
    }

    #[test]
    fn database_error_is_sanitized() {
        let err = ApiError::database(DbErr::Type("column mismatch".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "A database error occurred");
        assert!(err.details().is_none());
    }

    #[test]
    fn shape_error_does_not_leak_internals() {
        let err = ApiError::shape("template 123 failed output schema check");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("123"));
    }

    #[test]
    fn generic_dberr_becomes_database_error() {
        let err: ApiError = DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
