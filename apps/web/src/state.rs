use std::sync::Arc;

use tokio::sync::RwLock;

use crate::intake_client::{CandidateResult, IntakeClient};

/// One-shot message shown above the form after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Error(_) => "error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(msg) | Notice::Error(msg) => msg,
        }
    }
}

/// What the operator has done this session: the requirements in the form,
/// every result in submission order, and the pending notice.
#[derive(Debug, Default)]
pub struct SessionBoard {
    pub job_requirements: String,
    pub results: Vec<CandidateResult>,
    pub notice: Option<Notice>,
}

#[derive(Clone)]
pub struct AppState {
    pub intake: IntakeClient,
    pub board: Arc<RwLock<SessionBoard>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(intake: IntakeClient, max_upload_bytes: usize) -> Self {
        Self {
            intake,
            board: Arc::new(RwLock::new(SessionBoard::default())),
            max_upload_bytes,
        }
    }
}
