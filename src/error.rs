//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
///
/// Missing keys are never errors: `get` and `clear` report absence through
/// their return values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Eviction was attempted on an empty recency list.
    ///
    /// The capacity check makes this unreachable, so seeing it means the
    /// list and the key index have drifted apart.
    #[error("Recency list is empty")]
    Empty,

    /// Caller supplied an out-of-range option or malformed input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The timer could not be scheduled
    #[error("Scheduler unavailable: {0}")]
    Scheduler(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Scheduler(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Empty => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
