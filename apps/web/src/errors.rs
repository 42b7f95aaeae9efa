use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors from talking to the intake service. These are shown to the operator,
/// not turned into HTTP failures.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Error talking to the intake service: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Intake service sent an unreadable result: {0}")]
    Decode(reqwest::Error),
}

/// Errors that abort a page request.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let WebError::Render(e) = &self;
        tracing::error!("Template error: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
