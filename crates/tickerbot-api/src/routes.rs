//! API route definitions

use crate::handlers::{chat, health};
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create application routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(chat::index_handler).post(chat::ask_handler))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
}
