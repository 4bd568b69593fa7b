//! Axum route handlers for the Generation API.

use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};
use serde::Serialize;

use super::pipeline::GenerationInput;
use super::stream::event_stream;
use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_FILENAME: &str = "file.pdf";
const DEFAULT_LANGUAGE: &str = "ru";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub cover_letter: String,
}

/// Reads the `resume`, `job_url`, `job_text` and `language` parts.
/// Unknown parts are ignored; blank text parts count as absent.
async fn read_form(mut multipart: Multipart) -> Result<GenerationInput, AppError> {
    let mut resume = None;
    let mut job_url = None;
    let mut job_text = None;
    let mut language = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field
                    .file_name()
                    .filter(|f| !f.is_empty())
                    .unwrap_or(DEFAULT_FILENAME)
                    .to_string();
                let data = field.bytes().await?;
                resume = Some((filename, data));
            }
            "job_url" | "job_text" | "language" => {
                let value = field.text().await?;
                let value = Some(value).filter(|v| !v.trim().is_empty());
                match name.as_str() {
                    "job_url" => job_url = value,
                    "job_text" => job_text = value,
                    _ => language = value,
                }
            }
            _ => {}
        }
    }

    let (filename, resume) = resume
        .ok_or_else(|| AppError::UnprocessableEntity("Field 'resume' is required".to_string()))?;

    Ok(GenerationInput {
        resume,
        filename,
        job_url,
        job_text,
        language: language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let input = read_form(multipart).await?;
    let user_id = user.map(|CurrentUser(u)| u.id);

    let cover_letter = state.pipeline.generate(input, user_id).await?;
    Ok(Json(GenerateResponse { cover_letter }))
}

/// POST /api/generate/stream
///
/// Input errors are plain JSON errors; once streaming starts, a model failure
/// is reported in-band as an `error:` frame.
pub async fn handle_generate_stream(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = read_form(multipart).await?;
    let user_id = user.map(|CurrentUser(u)| u.id);

    let frames = state.pipeline.generate_stream(input, user_id).await?;
    Ok(event_stream(frames))
}
