//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use stockroom_store::StoreError;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("file wasn't uploaded")]
    FileMissing,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("filter error: {0}")]
    Filter(#[from] stockroom_core::FilterError),

    #[error("import error: {0}")]
    Import(#[from] stockroom_core::ImportError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::FileMissing => "file_missing",
            Self::Internal(_) => "internal_error",
            Self::Filter(_) => "invalid_filter",
            Self::Import(_) => "invalid_import",
            Self::Store(e) => match e {
                StoreError::NotFound(_) => "not_found",
                StoreError::AlreadyExists(_) => "already_exists",
                StoreError::ForeignKey(_) => "unresolved_reference",
                StoreError::InsufficientStock { .. } => "insufficient_stock",
                _ => "store_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::FileMissing => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Filter(_) => StatusCode::BAD_REQUEST,
            Self::Import(_) => StatusCode::BAD_REQUEST,
            Self::Store(e) => match e {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
                StoreError::ForeignKey(_) => StatusCode::CONFLICT,
                StoreError::InsufficientStock { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_maps_to_conflict() {
        let err = ApiError::Store(StoreError::InsufficientStock {
            available: 3,
            delta: -5,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "insufficient_stock");
        assert!(err.to_string().contains("insufficient stock"));
    }

    #[test]
    fn unknown_product_maps_to_not_found() {
        let err = ApiError::Store(StoreError::NotFound("product 9".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn missing_file_is_a_bad_request_with_the_domain_message() {
        let err = ApiError::FileMissing;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "file wasn't uploaded");
    }
}
