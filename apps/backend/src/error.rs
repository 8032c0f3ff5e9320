//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use literacy_core::ContentError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] ContentError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Core(err) if err.is_invalid_input() => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::Core(ContentError::Metrics(_)) => {
                (StatusCode::BAD_GATEWAY, "metrics_error")
            }
            ApiError::Core(_) => (StatusCode::INTERNAL_SERVER_ERROR, "repository_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("content c-1".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("limit too large".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_level_is_bad_request() {
        let error = ApiError::from(ContentError::UnknownLevel("L9".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_error_status() {
        let error = ApiError::from(ContentError::Repository("lock poisoned".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_metrics_error_status() {
        let error = ApiError::from(ContentError::Metrics("timeout".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_config_error_status() {
        let error = ApiError::Config("PORT must be a number".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_core() {
        let error = ApiError::from(ContentError::UnknownLevel("L9".to_string()));
        assert_eq!(error.to_string(), "unknown level: L9");
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("content c-1".to_string());
        assert_eq!(error.to_string(), "Not found: content c-1");
    }

    #[test]
    fn test_error_display_config() {
        let error = ApiError::Config("PORT must be a number".to_string());
        assert_eq!(error.to_string(), "Configuration error: PORT must be a number");
    }
}
