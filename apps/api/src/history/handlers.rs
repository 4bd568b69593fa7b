//! History API: a signed-in user's past generations.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::models::generation::GenerationRecord;
use crate::state::AppState;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// A history entry as the client sees it. The resume text stays server-side.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub resume_filename: String,
    pub job_url: Option<String>,
    pub job_text: String,
    pub cover_letter: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl From<GenerationRecord> for HistoryItem {
    fn from(record: GenerationRecord) -> Self {
        Self {
            id: record.id,
            resume_filename: record.resume_filename,
            job_url: record.job_url,
            job_text: record.job_text,
            cover_letter: record.cover_letter,
            language: record.language,
            created_at: record.created_at,
        }
    }
}

/// GET /api/history?limit=N
/// Newest first. `limit` defaults to 50 and is clamped to 1..=100.
pub async fn handle_list_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryItem>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = state.store.list_generations(user.id, limit).await?;
    Ok(Json(records.into_iter().map(HistoryItem::from).collect()))
}

/// DELETE /api/history/:id
pub async fn handle_delete_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let not_found = || AppError::NotFound("Generation not found".to_string());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    if !state.store.delete_generation(user.id, id).await? {
        return Err(not_found());
    }

    info!("Deleted generation {id} for user {}", user.id);
    Ok(Json(json!({ "status": "deleted" })))
}
