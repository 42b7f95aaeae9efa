//! HTTP client for the intake service.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ClientError;

const ANALYZE_PATH: &str = "/api/analyze-cv";
const HEALTH_PATH: &str = "/health";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Evaluation as returned by `POST /api/analyze-cv`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateResult {
    pub evaluation_id: Uuid,
    pub candidate_name: String,
    pub file_name: String,
    pub score: u8,
    pub rationale: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub model: String,
    pub evaluated_at: DateTime<Utc>,
}

impl CandidateResult {
    /// CSS band for the score badge: high from 70, medium from 50.
    pub fn score_band(&self) -> &'static str {
        if self.score >= 70 {
            "score-high"
        } else if self.score >= 50 {
            "score-medium"
        } else {
            "score-low"
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// A CV file picked by the operator.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct IntakeClient {
    client: Client,
    base_url: String,
}

impl IntakeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits one CV against the given requirements. Waits for the full
    /// evaluation; there is no polling.
    pub async fn evaluate(
        &self,
        job_requirements: &str,
        file: UploadedFile,
    ) -> Result<CandidateResult, ClientError> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .text("job_description", job_requirements.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}{ANALYZE_PATH}", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("Intake service returned {status}"));
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CandidateResult>()
            .await
            .map_err(ClientError::Decode)
    }

    /// True when the intake service answers its health check.
    pub async fn health(&self) -> bool {
        self.client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn candidate(name: &str, score: u8) -> CandidateResult {
        CandidateResult {
            evaluation_id: Uuid::new_v4(),
            candidate_name: name.to_string(),
            file_name: format!("{}.pdf", name.to_lowercase().replace(' ', "_")),
            score,
            rationale: "Matches most requirements.".to_string(),
            strengths: vec!["Rust".to_string()],
            weaknesses: vec!["No Kubernetes".to_string()],
            model: "test/model".to_string(),
            evaluated_at: Utc::now(),
        }
    }

    pub const RESULT_JSON: &str = r#"{
        "evaluation_id": "6f1c2a4e-3b0d-4a53-9f55-2f7d7c9b1e10",
        "candidate_name": "Jane Doe",
        "file_name": "jane.pdf",
        "document_format": "pdf",
        "score": 74,
        "rationale": "Good systems background.",
        "strengths": ["Rust", "Tokio"],
        "weaknesses": ["No Go"],
        "model": "deepseek/deepseek-r1-distill-llama-70b",
        "raw_output": "{\"score\": 74}",
        "evaluated_at": "2026-10-19T09:30:00Z"
    }"#;
}
