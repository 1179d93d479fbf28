//! Error types for moodmix-mm HTTP API

use crate::matcher::MatchError;
use crate::mood::UnknownMood;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed feature vector (400)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Bad parameter such as a non-positive k (400)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Mood name not in the preset table (400)
    #[error(transparent)]
    UnknownMood(#[from] UnknownMood),

    /// No songs loaded (503)
    #[error("Catalog is empty; import songs first")]
    EmptyCatalog,

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// moodmix-common error
    #[error("Common error: {0}")]
    Common(#[from] moodmix_common::Error),
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidQuery(e) => ApiError::InvalidQuery(e.to_string()),
            MatchError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            MatchError::EmptyCatalog => ApiError::EmptyCatalog,
        }
    }
}

/// Unreadable POST bodies (bad JSON, wrong field types) are query errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

/// Unparseable query strings (e.g. `?page=abc`)
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "INVALID_QUERY", msg),
            ApiError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg),
            ApiError::UnknownMood(ref err) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_MOOD", err.to_string())
            }
            ApiError::EmptyCatalog => {
                warn!("Recommendation requested with an empty catalog");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "EMPTY_CATALOG",
                    "Catalog is empty; import songs first".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Common(moodmix_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(ref err) => {
                error!("Common error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
