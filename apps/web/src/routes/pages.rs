//! Page handlers. Every form post ends in a redirect back to `/`, so the page
//! cycles idle → submitting → result/error → idle.

use askama::Template;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::WebError;
use crate::intake_client::UploadedFile;
use crate::state::{AppState, Notice};
use crate::views::IndexPage;

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let intake_healthy = state.intake.health().await;

    let mut board = state.board.write().await;
    let notice = board.notice.take();
    let page = IndexPage {
        job_requirements: &board.job_requirements,
        results: &board.results,
        notice,
        intake_url: state.intake.base_url(),
        intake_healthy,
    };

    Ok(Html(page.render()?))
}

/// POST /evaluate
///
/// Always redirects back to `/`. Any failure, including an oversized upload,
/// becomes an error notice on the page.
pub async fn evaluate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Redirect {
    let submission = match multipart {
        Ok(mut multipart) => read_submission(&mut multipart, state.max_upload_bytes).await,
        Err(e) => Err(format!("Invalid form submission: {}", e.body_text())),
    };

    let (job_requirements, notice) = match submission {
        Ok(submission) => {
            let notice = submit(&state, &submission.job_requirements, submission.file).await;
            (Some(submission.job_requirements), notice)
        }
        Err(message) => {
            warn!("Rejected form submission: {message}");
            (None, Notice::Error(message))
        }
    };

    let mut board = state.board.write().await;
    if let Some(job_requirements) = job_requirements {
        board.job_requirements = job_requirements;
    }
    board.notice = Some(notice);

    Redirect::to("/")
}

struct Submission {
    job_requirements: String,
    file: Option<UploadedFile>,
}

fn form_error(err: MultipartError, upload_limit: usize) -> String {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!("The upload exceeds the {upload_limit} byte limit.")
    } else {
        format!("Invalid form submission: {err}")
    }
}

async fn read_submission(
    multipart: &mut Multipart,
    upload_limit: usize,
) -> Result<Submission, String> {
    let mut job_requirements = String::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, upload_limit))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" => {
                job_requirements = field
                    .text()
                    .await
                    .map_err(|e| form_error(e, upload_limit))?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error(e, upload_limit))?;
                // Browsers send an empty, unnamed part when no file was picked.
                if !file_name.is_empty() && !bytes.is_empty() {
                    file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(Submission {
        job_requirements,
        file,
    })
}

async fn submit(state: &AppState, job_requirements: &str, file: Option<UploadedFile>) -> Notice {
    if job_requirements.trim().is_empty() {
        return Notice::Error("Enter the job requirements before analyzing a CV.".to_string());
    }
    let Some(file) = file else {
        return Notice::Error("Choose a PDF or DOCX file to analyze.".to_string());
    };

    info!("Submitting {} for evaluation", file.file_name);
    match state.intake.evaluate(job_requirements, file).await {
        Ok(result) => {
            let notice = Notice::Success(format!(
                "CV analyzed successfully! Score: {}/100",
                result.score
            ));
            state.board.write().await.results.push(result);
            notice
        }
        Err(e) => {
            warn!("Evaluation failed: {e}");
            Notice::Error(format!("Error analyzing CV: {e}"))
        }
    }
}

/// POST /clear
pub async fn clear(State(state): State<AppState>) -> Redirect {
    let mut board = state.board.write().await;
    board.results.clear();
    board.notice = Some(Notice::Success(
        "All candidates cleared successfully".to_string(),
    ));
    Redirect::to("/")
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvsift-web"
    }))
}
