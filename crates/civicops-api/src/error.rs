//! API error types and handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use civicops_domain::DomainError;
use serde_json::json;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] civicops_config::ConfigError),
}

impl ApiError {
    /// Not-found error for a work item id
    pub fn work_item_not_found(id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("Work item '{}' not found", id))
    }

    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Authentication(_) => (StatusCode::UNAUTHORIZED, "authentication_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::Domain(DomainError::ValidationError { .. }) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Domain(DomainError::InvalidIdentifier { .. }) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
