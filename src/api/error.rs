//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::pane::StoreError;
use crate::summary::GroupError;
use crate::table::ParseError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upload could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Group-sum over unknown or non-numeric columns
    #[error("Group error: {0}")]
    Group(#[from] GroupError),

    /// Session lookup or capacity failure
    #[error("Session error: {0}")]
    Session(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Parse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR"),
            ApiError::Group(GroupError::ColumnNotFound(_)) => {
                (StatusCode::BAD_REQUEST, "COLUMN_NOT_FOUND")
            }
            ApiError::Group(GroupError::NotNumeric(_)) => (StatusCode::BAD_REQUEST, "NOT_NUMERIC"),
            ApiError::Session(StoreError::SessionNotFound(_)) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
            }
            ApiError::Session(StoreError::TooManySessions(_)) => {
                (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_SESSIONS")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Parse(ParseError::Empty), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ApiError::Session(StoreError::SessionNotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Session(StoreError::TooManySessions(1)),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ApiError::Group(GroupError::NotNumeric("v".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
