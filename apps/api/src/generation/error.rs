use axum::http::StatusCode;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::ExtractError;

/// Every way the generation pipeline can fail before a letter exists.
/// Each variant carries the status the HTTP boundary reports for it.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    UnreadableResume(String),

    #[error("Could not extract text from the resume.")]
    EmptyResume,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Provide either a job URL or job description text.")]
    MissingJobInput,

    #[error("Could not fetch job page: {0}")]
    FetchFailed(String),

    #[error("LLM generation failed: {0}")]
    ModelInvocationFailed(#[from] LlmError),
}

impl GenerationError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerationError::UnsupportedFormat(_)
            | GenerationError::UnreadableResume(_)
            | GenerationError::EmptyResume
            | GenerationError::InvalidUrl(_)
            | GenerationError::MissingJobInput => StatusCode::BAD_REQUEST,
            GenerationError::FetchFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GenerationError::ModelInvocationFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ExtractError> for GenerationError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat { .. } => {
                GenerationError::UnsupportedFormat(err.to_string())
            }
            ExtractError::Unreadable { .. } => GenerationError::UnreadableResume(err.to_string()),
        }
    }
}
