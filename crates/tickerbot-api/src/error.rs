//! API error handling
//!
//! Maps the core error kinds to distinct status codes with sanitized
//! bodies. Full detail is logged server-side and never reaches the
//! client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tickerbot_core::TickerbotError;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Client-facing message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Invalid request input; the message is client-safe
    BadRequest(String),
    /// A required collaborator is not configured
    ServiceUnavailable(String),
    /// The store or the model call failed
    UpstreamFailure(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ServiceUnavailable(detail) => {
                tracing::warn!(%detail, "Request rejected: service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service is not configured to answer requests".to_string(),
                )
            }
            AppError::UpstreamFailure(detail) => {
                tracing::error!(%detail, "Upstream failure");
                (StatusCode::BAD_GATEWAY, "Upstream service error".to_string())
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<TickerbotError> for AppError {
    fn from(err: TickerbotError) -> Self {
        match err {
            TickerbotError::ValidationError(msg) => AppError::BadRequest(msg),
            TickerbotError::UpstreamUnavailable(msg) => AppError::ServiceUnavailable(msg),
            TickerbotError::DatabaseError(msg) => {
                AppError::UpstreamFailure(format!("Database error: {msg}"))
            }
            TickerbotError::LlmError(msg) => AppError::UpstreamFailure(format!("LLM error: {msg}")),
            TickerbotError::ConfigError(msg) => {
                AppError::Internal(format!("Configuration error: {msg}"))
            }
            TickerbotError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = TickerbotError::ValidationError("User input is required".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_upstream_errors_map_to_upstream_failure() {
        let db: AppError = TickerbotError::DatabaseError("connection reset".into()).into();
        let llm: AppError = TickerbotError::LlmError("quota exceeded".into()).into();
        assert!(matches!(db, AppError::UpstreamFailure(_)));
        assert!(matches!(llm, AppError::UpstreamFailure(_)));
    }
}
