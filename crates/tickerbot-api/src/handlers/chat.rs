//! Chat page and ask handlers

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tickerbot_chat::{is_exit, FAREWELL};
use utoipa::ToSchema;

/// Ask request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    /// User's question; the literal "exit" (any casing) short-circuits
    /// with a farewell
    #[serde(default)]
    #[schema(example = "Tell me about Acme Capital")]
    pub user_input: String,
}

/// Ask response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    /// Generated answer
    #[schema(example = "Acme Capital holds positions in...")]
    pub response: String,
}

/// Serve the static chat page.
pub async fn index_handler() -> impl IntoResponse {
    Html(include_str!("../../assets/index.html"))
}

/// Handle ask requests
#[utoipa::path(
    post,
    path = "/",
    tag = "chat",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer generated", body = AskResponse),
        (status = 400, description = "Missing or empty input", body = ErrorBody),
        (status = 502, description = "Store or model failure", body = ErrorBody),
        (status = 503, description = "Pipeline not configured", body = ErrorBody)
    )
)]
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    if req.user_input.trim().is_empty() {
        return Err(AppError::BadRequest("User input is required".to_string()));
    }

    // Exit sentinel: answer without touching the store or the model.
    if is_exit(&req.user_input) {
        return Ok((
            StatusCode::OK,
            Json(AskResponse {
                response: FAREWELL.to_string(),
            }),
        ));
    }

    let pipeline = state.pipeline().ok_or_else(|| {
        AppError::ServiceUnavailable("no LLM credentials configured".to_string())
    })?;

    let answer = pipeline.ask(&req.user_input).await?;
    tracing::debug!(
        context_records = answer.context_records,
        context_available = answer.context_available,
        elapsed_ms = answer.processing_time_ms,
        "Ask completed"
    );

    Ok((
        StatusCode::OK,
        Json(AskResponse {
            response: answer.answer,
        }),
    ))
}
