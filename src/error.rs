//! Error handling module
//!
//! Provides unified error types and handling for the entire application.
//! Client-caused failures (validation, bad input, missing records) are kept
//! apart from infrastructure failures, which are logged and reported as 500.

use crate::validation::ValidationError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Whether this failure was caused by the infrastructure rather than the client
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Pool(_) | AppError::Internal(_) | AppError::Config(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Pool(_) | AppError::Internal(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    fn new(code: &'static str, message: String) -> Self {
        Self {
            status: "error",
            message,
            code,
            field: None,
            rule: None,
            error: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(e) => ErrorResponse {
                field: Some(e.field),
                rule: Some(e.rule),
                ..ErrorResponse::new("VALIDATION_ERROR", e.message)
            },
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                ErrorResponse {
                    error: Some(e.to_string()),
                    ..ErrorResponse::new("DATABASE_ERROR", "A database error occurred".to_string())
                }
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                ErrorResponse {
                    error: Some(e.to_string()),
                    ..ErrorResponse::new("DATABASE_UNAVAILABLE", "The database is unavailable".to_string())
                }
            }
            AppError::Unauthorized(msg) => ErrorResponse::new("UNAUTHORIZED", msg),
            AppError::NotFound(msg) => ErrorResponse::new("NOT_FOUND", msg),
            AppError::MethodNotAllowed => {
                ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed".to_string())
            }
            AppError::Conflict(msg) => ErrorResponse::new("CONFLICT", msg),
            AppError::BadRequest(msg) => ErrorResponse::new("BAD_REQUEST", msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                ErrorResponse::new("CONFIG_ERROR", "A configuration error occurred".to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

/// Map a unique-constraint violation to a conflict, anything else to a database error
pub fn map_unique_violation(e: tokio_postgres::Error, msg: impl Into<String>) -> AppError {
    if e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
        AppError::Conflict(msg.into())
    } else {
        AppError::Database(e)
    }
}

/// Map a foreign-key violation to an `exists` validation failure on `field`
pub fn map_missing_reference(e: tokio_postgres::Error, field: impl Into<String>) -> AppError {
    if e.code() == Some(&tokio_postgres::error::SqlState::FOREIGN_KEY_VIOLATION) {
        let field = field.into();
        let message = format!("The selected {} is invalid.", field);
        ValidationError::new(field, "exists", message).into()
    } else {
        AppError::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let err = AppError::from(ValidationError::new("email", "required", "The email field is required."));
        assert!(!err.is_infrastructure());

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            serde_json::json!({
                "status": "error",
                "message": "The email field is required.",
                "code": "VALIDATION_ERROR",
                "field": "email",
                "rule": "required"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = AppError::Internal("socket closed".to_string());
        assert!(err.is_infrastructure());

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_json(not_found_error("Quote missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
