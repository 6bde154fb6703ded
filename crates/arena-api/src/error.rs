//! Error types for the arena HTTP API.
//!
//! [`ApiError`] wraps every engine rejection plus the request-shape
//! failures that never reach the engine, and converts into an Axum
//! response with a JSON `{"error", "status"}` body.

use arena_core::ArenaError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by the arena HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The engine rejected the operation.
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// A lobby or player identifier could not be parsed.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The request body was missing, malformed or inconsistent with the path.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Arena(err) => match err {
                ArenaError::NotFound(_) => StatusCode::NOT_FOUND,
                ArenaError::NotYourTurn { .. } => StatusCode::FORBIDDEN,
                ArenaError::IllegalMove { .. } => StatusCode::BAD_REQUEST,
                ArenaError::MatchAlreadyConcluded { .. }
                | ArenaError::SeriesComplete(_)
                | ArenaError::AlreadyQueued { .. } => StatusCode::CONFLICT,
            },
            Self::InvalidId(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
