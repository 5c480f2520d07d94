//! Error types for the application service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;

/// Error type for gated operations and remote calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// No authenticated session
    #[error("unauthorized")]
    Unauthorized,

    /// The permission gate or the coarse role check refused the action
    /// before any remote call
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Attendance already recorded for the composite key; detected
    /// locally, no remote call was made
    #[error("attendance already recorded for {service_date} ({service_type})")]
    DuplicateRecord {
        service_date: NaiveDate,
        service_type: String,
    },

    /// Category sub-counts do not sum to the declared total; detected
    /// locally, no remote call was made
    #[error(
        "total count {declared_total} does not match the category sum {counted_total} \
         (off by {mismatch})"
    )]
    ValidationMismatch {
        declared_total: i32,
        counted_total: i32,
        mismatch: i32,
    },

    /// Malformed request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The external auth provider rejected or failed a call
    #[error("auth provider error: {0}")]
    Provider(String),

    /// A remote store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::DuplicateRecord { .. } => StatusCode::CONFLICT,
            ApiError::ValidationMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(StoreError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_mismatch_message_carries_amount() {
        let err = ApiError::ValidationMismatch {
            declared_total: 150,
            counted_total: 158,
            mismatch: 8,
        };
        let message = err.to_string();
        assert!(message.contains("150"));
        assert!(message.contains("158"));
        assert!(message.contains("off by 8"));
    }
}
