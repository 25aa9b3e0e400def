//! Centralized API error handling
//!
//! Every error body carries a human-readable `message` and a machine `code`.
//! Storage failures additionally expose the underlying error text as `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::loan::LifecycleError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    /// Also used for records owned by someone else, so existence never leaks
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}: {details}")]
    StorageFailure { message: String, details: String },
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::StorageFailure { .. } => "STORAGE_FAILURE",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::StorageFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorResponse {
        let code = self.error_code().to_string();
        match self {
            ApiError::StorageFailure { message, details } => ErrorResponse {
                message,
                code,
                error: Some(details),
            },
            ApiError::NotFound(message) | ApiError::Unauthorized(message) => ErrorResponse {
                message,
                code,
                error: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log server errors
        if status.is_server_error() {
            tracing::error!(error = %self, code = %self.error_code(), "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = %self.error_code(), "Client error occurred");
        }

        (status, Json(self.into_body())).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound { operation, .. } => {
                ApiError::NotFound(operation.not_found_message().to_string())
            }
            LifecycleError::Storage { operation, source } => ApiError::StorageFailure {
                message: operation.failure_message().to_string(),
                details: source.to_string(),
            },
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{Operation, StoreError};

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::Unauthorized("test".to_string()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(
            ApiError::StorageFailure {
                message: "m".to_string(),
                details: "d".to_string()
            }
            .error_code(),
            "STORAGE_FAILURE"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("test".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_hides_ownership() {
        let err: ApiError = LifecycleError::NotFound {
            operation: Operation::CloseProfile,
            lender_id: "L1".to_string(),
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = err.into_body();
        assert_eq!(
            body.message,
            "Loan not found or you do not have permission to close this profile"
        );
        assert!(body.error.is_none());
    }

    #[test]
    fn test_storage_failure_body() {
        let err: ApiError = LifecycleError::Storage {
            operation: Operation::StopInterest,
            source: StoreError::Unavailable("pool timed out".to_string()),
        }
        .into();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.into_body();
        assert_eq!(body.message, "Error stopping interest");
        assert_eq!(body.code, "STORAGE_FAILURE");
        assert!(body.error.unwrap().contains("pool timed out"));
    }
}
