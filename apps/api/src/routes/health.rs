use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Answers as long as the process runs; never touches the reasoning API.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvsift-api"
    }))
}
