//! Validate, extract, prompt, call the reasoning API once, shape the result.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::evaluation::prompts::build_evaluation_prompt;
use crate::evaluation::verdict::parse_verdict;
use crate::extraction::{extract_text_blocking, DocumentFormat};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::ReasoningClient;

/// Runs one CV-to-job evaluation per call. Holds no per-request state.
#[derive(Clone)]
pub struct Evaluator {
    reasoning: Arc<dyn ReasoningClient>,
}

impl Evaluator {
    pub fn new(reasoning: Arc<dyn ReasoningClient>) -> Self {
        Self { reasoning }
    }

    /// Both input checks run before any extraction or network traffic.
    pub async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResult, AppError> {
        let job_requirements = request.job_requirements.trim();
        if job_requirements.is_empty() {
            return Err(AppError::Validation(
                "job requirements cannot be empty".to_string(),
            ));
        }

        let document = request.document;
        let format = DocumentFormat::detect(&document.file_name, document.content_type.as_deref())
            .ok_or_else(|| {
                AppError::UnsupportedFormat(format!(
                    "'{}' is not supported. Please upload PDF or DOCX files.",
                    document.file_name
                ))
            })?;

        if document.bytes.is_empty() {
            return Err(AppError::Validation(format!(
                "'{}' is empty",
                document.file_name
            )));
        }

        let evaluation_id = Uuid::new_v4();
        let extracted = extract_text_blocking(format, document.bytes).await?;
        info!(
            %evaluation_id,
            file_name = %document.file_name,
            format = extracted.format.as_str(),
            chars = extracted.text.len(),
            "Extracted CV text"
        );

        let prompt = build_evaluation_prompt(job_requirements, &extracted.text);
        let completion = self.reasoning.complete(&prompt, JSON_ONLY_SYSTEM).await?;
        let verdict = parse_verdict(&completion.text)?;

        info!(%evaluation_id, score = verdict.score, model = %completion.model, "Evaluation complete");

        Ok(EvaluationResult {
            evaluation_id,
            candidate_name: extracted.candidate_name(),
            file_name: document.file_name,
            document_format: format,
            score: verdict.score,
            rationale: verdict.analysis,
            strengths: verdict.strengths,
            weaknesses: verdict.weaknesses,
            model: completion.model,
            raw_output: completion.text,
            evaluated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::evaluation::models::DocumentUpload;
    use crate::extraction::fixtures::docx_bytes;
    use crate::llm_client::testing::ScriptedClient;
    use crate::llm_client::LlmError;

    const VERDICT_82: &str = r#"```json
{"score": 82, "analysis": "Solid Rust background.", "strengths": ["Rust"], "weaknesses": ["No Go"]}
```"#;

    fn cv_request(job_requirements: &str, file_name: &str, bytes: Vec<u8>) -> EvaluationRequest {
        EvaluationRequest {
            job_requirements: job_requirements.to_string(),
            document: DocumentUpload {
                file_name: file_name.to_string(),
                content_type: None,
                bytes: Bytes::from(bytes),
            },
        }
    }

    fn docx_cv() -> Vec<u8> {
        docx_bytes(&["Jane Doe", "Senior Rust Engineer, 8 years"], None)
    }

    #[tokio::test]
    async fn test_docx_evaluation_returns_bounded_score() {
        let client = Arc::new(ScriptedClient::replying([VERDICT_82]));
        let evaluator = Evaluator::new(client.clone());

        let result = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", docx_cv()))
            .await
            .unwrap();

        assert_eq!(result.score, 82);
        assert!(result.score <= 100);
        assert_eq!(result.candidate_name, "Jane Doe");
        assert_eq!(result.file_name, "jane.docx");
        assert_eq!(result.document_format, DocumentFormat::Docx);
        assert_eq!(result.rationale, "Solid Rust background.");
        assert_eq!(result.strengths, vec!["Rust"]);
        assert_eq!(result.weaknesses, vec!["No Go"]);
        assert_eq!(result.raw_output, VERDICT_82);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_pdf_evaluation_returns_bounded_score() {
        let client = Arc::new(ScriptedClient::replying([r#"{"score": 250}"#]));
        let evaluator = Evaluator::new(client.clone());
        let pdf = crate::extraction::fixtures::pdf_bytes("Hello Recruiter");

        let result = evaluator
            .evaluate(cv_request("Recruiting lead", "cv.pdf", pdf))
            .await
            .unwrap();

        assert_eq!(result.score, 100);
        assert_eq!(result.document_format, DocumentFormat::Pdf);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_format_fails_before_network_call() {
        let client = Arc::new(ScriptedClient::replying([VERDICT_82]));
        let evaluator = Evaluator::new(client.clone());

        let err = evaluator
            .evaluate(cv_request("5+ years Rust", "cv.txt", b"Jane Doe".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_requirements_rejected_before_network_call() {
        let client = Arc::new(ScriptedClient::replying([VERDICT_82]));
        let evaluator = Evaluator::new(client.clone());

        let err = evaluator
            .evaluate(cv_request("  \n\t ", "jane.docx", docx_cv()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_extraction_error() {
        let client = Arc::new(ScriptedClient::replying([VERDICT_82]));
        let evaluator = Evaluator::new(client.clone());

        let err = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", b"not a docx".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_upload_is_validation_error() {
        let client = Arc::new(ScriptedClient::replying([VERDICT_82]));
        let evaluator = Evaluator::new(client.clone());

        let err = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.pdf", Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_external_api_error() {
        let client = Arc::new(ScriptedClient::failing(503));
        let evaluator = Evaluator::new(client.clone());

        let err = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", docx_cv()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::ExternalApi(LlmError::Api { status: 503, .. })
        ));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_external_api_error() {
        let client = Arc::new(ScriptedClient::replying(["I would rather not say."]));
        let evaluator = Evaluator::new(client);

        let err = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", docx_cv()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ExternalApi(LlmError::MissingJson)));
    }

    #[tokio::test]
    async fn test_sequential_evaluations_are_independent() {
        let client = Arc::new(ScriptedClient::replying([
            r#"{"score": 40, "analysis": "first"}"#,
            r#"{"score": 75, "analysis": "second"}"#,
        ]));
        let evaluator = Evaluator::new(client.clone());

        let first = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", docx_cv()))
            .await
            .unwrap();
        let second = evaluator
            .evaluate(cv_request("5+ years Rust", "jane.docx", docx_cv()))
            .await
            .unwrap();

        assert_eq!(first.score, 40);
        assert_eq!(second.score, 75);
        assert_eq!(second.rationale, "second");
        assert_ne!(first.evaluation_id, second.evaluation_id);
        assert_eq!(client.calls(), 2);
    }
}
