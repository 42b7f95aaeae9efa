pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(pages::index))
        .route("/evaluate", post(pages::evaluate))
        .route("/clear", post(pages::clear))
        .route("/health", get(pages::health))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
