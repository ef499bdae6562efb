//! Error types for the API server
//!
//! Provides unified error handling using thiserror.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Message sent to callers for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

// == Api Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or conflicting query arguments
    #[error("{0}")]
    InvalidArgs(String),

    /// Unknown resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream or server-side failure; the detail is logged, never sent
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Logs `err` against `path` and wraps it as an internal error.
    pub fn internal(path: &str, err: impl Display) -> Self {
        error!("Internal error while handling {}: {}", path, err);
        ApiError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidArgs(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the API server.
pub type Result<T> = std::result::Result<T, ApiError>;
