//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::PortError;
use domain_catalog::CatalogError;
use domain_quote::QuoteError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A step requirement is unmet; `field` names the offending path
    #[error("Validation error: {message}")]
    Validation { message: String, field: String },

    /// The quote backend refused or could not be reached
    #[error("Submission failed: {message}")]
    Submission { message: String, detail: String },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, field } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                Some(vec![field]),
            ),
            ApiError::Submission { message, detail } => {
                (StatusCode::BAD_GATEWAY, "submission_failed", message, Some(vec![detail]))
            }
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg, None),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Validation(v) => ApiError::Validation {
                message: v.message,
                field: v.field.to_string(),
            },
            QuoteError::Submission(s) => ApiError::Submission {
                message: s.message,
                detail: s.detail,
            },
            QuoteError::SubmissionInFlight
            | QuoteError::StaleSubmission(_)
            | QuoteError::InvalidTransition(_) => ApiError::Conflict(err.to_string()),
            QuoteError::Core(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        if err.is_transient() {
            ApiError::ServiceUnavailable(err.to_string())
        } else {
            ApiError::Upstream(err.to_string())
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::PlanNotFound(id) => ApiError::NotFound(format!("Plan {}", id)),
            CatalogError::Port(e) => e.into(),
        }
    }
}
