//! Axum route handlers for the evaluation API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::evaluation::models::{DocumentUpload, EvaluationRequest, EvaluationResult};
use crate::state::AppState;

/// POST /api/analyze-cv
///
/// Multipart form: `file` (PDF or DOCX) and `job_description`
/// (`job_requirements` is accepted as an alias).
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        AppError::Validation(format!("Expected a multipart form: {}", e.body_text()))
    })?;
    let request = read_evaluation_form(&mut multipart, state.config.max_upload_bytes).await?;
    let result = state.evaluator.evaluate(request).await?;
    Ok(Json(result))
}

/// Over-limit bodies surface as a stream error partway through the form.
fn form_error(err: MultipartError, upload_limit: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the {upload_limit} byte limit"))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

async fn read_evaluation_form(
    multipart: &mut Multipart,
    upload_limit: usize,
) -> Result<EvaluationRequest, AppError> {
    let mut job_requirements: Option<String> = None;
    let mut document: Option<DocumentUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, upload_limit, "Invalid multipart body"))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" | "job_requirements" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| form_error(e, upload_limit, "Invalid job description"))?;
                job_requirements = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error(e, upload_limit, "Invalid file upload"))?;
                document = Some(DocumentUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            other => {
                tracing::debug!("Ignoring unexpected form field '{other}'");
            }
        }
    }

    let job_requirements = job_requirements
        .ok_or_else(|| AppError::Validation("job_description field is required".to_string()))?;
    let document =
        document.ok_or_else(|| AppError::Validation("file field is required".to_string()))?;

    Ok(EvaluationRequest {
        job_requirements,
        document,
    })
}
