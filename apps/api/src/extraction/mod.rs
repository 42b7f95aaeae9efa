//! Document text extraction for uploaded CVs.
//!
//! Only PDF and DOCX are accepted. Parsing is CPU-bound and some parsers panic
//! on malformed input, so [`extract_text_blocking`] runs it on tokio's blocking
//! pool and reports a panic as an ordinary [`ExtractionError`].

mod docx;
mod pdf;

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

/// The two document kinds the intake service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from the file extension, falling back to the
    /// declared content type when the name has no usable extension.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("pdf") => Some(DocumentFormat::Pdf),
            Some("docx") => Some(DocumentFormat::Docx),
            Some(_) => None,
            None => content_type.and_then(Self::from_content_type),
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_lowercase().as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentFormat::Docx)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unreadable PDF: {0}")]
    Pdf(String),

    #[error("unreadable DOCX: {0}")]
    Docx(String),

    #[error("document contains no extractable text")]
    Empty,

    #[error("text extraction aborted: {0}")]
    Aborted(String),
}

/// Plain text pulled out of one uploaded document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub format: DocumentFormat,
    pub text: String,
}

impl ExtractedText {
    /// First non-blank line of the document, which for a CV is almost always the name.
    pub fn candidate_name(&self) -> String {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(String::from)
            .unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string())
    }
}

/// Extracts text synchronously. Fails with [`ExtractionError::Empty`] when the
/// document parses but holds nothing but whitespace.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let raw = match format {
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes)?,
    };

    let text = raw.trim();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }

    Ok(ExtractedText {
        format,
        text: text.to_string(),
    })
}

pub async fn extract_text_blocking(
    format: DocumentFormat,
    bytes: Bytes,
) -> Result<ExtractedText, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(format, &bytes))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}
