use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// One rejected value in an inbound payload, addressed by its JSON path
/// (e.g. `fields.2.label`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::Duplicate(msg) => AppError::Duplicate(msg),
            StorageError::Database(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Invalid request payload".to_string(),
                Some(violations),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            AppError::Duplicate(msg) => (StatusCode::BAD_REQUEST, "DUPLICATE", msg, None),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(violations) => Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "details": violations,
                }
            })),
            None => Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_mapping() {
        let err: AppError = StorageError::NotFound("Form not found".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = StorageError::Duplicate("Email already exists".to_string()).into();
        assert!(matches!(err, AppError::Duplicate(_)));

        let err: AppError = StorageError::Database("connection reset".to_string()).into();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn test_validation_response_is_bad_request() {
        let err = AppError::Validation(vec![FieldViolation::new("name", "name is required")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_response_status() {
        let response = AppError::not_found("QR code not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
