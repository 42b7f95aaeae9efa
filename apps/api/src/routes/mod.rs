pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/health/", get(health::health_handler))
        .route("/api/analyze-cv", post(handlers::handle_analyze_cv))
        .route("/api/analyze-cv/", post(handlers::handle_analyze_cv))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
