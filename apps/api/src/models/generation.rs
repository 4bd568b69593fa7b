use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One completed generation, owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_filename: String,
    pub resume_text: String,
    pub job_url: Option<String>,
    pub job_text: String,
    pub cover_letter: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `GenerationRecord`; id and timestamp are assigned on write.
#[derive(Debug, Clone)]
pub struct NewGeneration {
    pub user_id: Uuid,
    pub resume_filename: String,
    pub resume_text: String,
    pub job_url: Option<String>,
    pub job_text: String,
    pub cover_letter: String,
    pub language: String,
}
