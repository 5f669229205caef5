//! API error handling

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::FieldErrors;
use domain_policy::BrokerageError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Policy code already registered: {0}")]
    DuplicateKey(String),

    #[error("Policy code cannot be changed")]
    CodeImmutable,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_type, details) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(errors.into_inner()),
            ),
            ApiError::DuplicateKey(_) => (StatusCode::CONFLICT, "duplicate_key", None),
            ApiError::CodeImmutable => (StatusCode::CONFLICT, "code_immutable", None),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BrokerageError> for ApiError {
    fn from(err: BrokerageError) -> Self {
        match err {
            BrokerageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            BrokerageError::Validation(errors) => ApiError::Validation(errors),
            BrokerageError::DuplicateKey(code) => ApiError::DuplicateKey(code.into_inner()),
            BrokerageError::CodeImmutable { .. } => ApiError::CodeImmutable,
            BrokerageError::Store(source) => {
                error!(error = %source, "Store failure");
                ApiError::Internal("The request could not be completed".to_string())
            }
        }
    }
}
