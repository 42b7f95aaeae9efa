use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::extraction::DocumentFormat;

/// A candidate document as received from the multipart form.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One evaluation submission. Lives only for the request that carries it.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub job_requirements: String,
    pub document: DocumentUpload,
}

/// Structured evaluation returned to the caller. Never stored server-side.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub evaluation_id: Uuid,
    pub candidate_name: String,
    pub file_name: String,
    pub document_format: DocumentFormat,
    /// Match percentage, always within 0..=100.
    pub score: u8,
    pub rationale: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub model: String,
    /// The model reply exactly as received.
    pub raw_output: String,
    pub evaluated_at: DateTime<Utc>,
}
