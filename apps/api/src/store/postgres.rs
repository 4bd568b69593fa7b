use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::models::generation::{GenerationRecord, NewGeneration};
use crate::models::user::{User, UserProfile};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, google_id, email, name, picture)
            VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, ''))
            ON CONFLICT (google_id) DO UPDATE SET
                email = COALESCE($3, users.email),
                name = COALESCE($4, users.name),
                picture = COALESCE($5, users.picture)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.google_id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.picture)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_generation(&self, new: NewGeneration) -> Result<GenerationRecord, sqlx::Error> {
        sqlx::query_as::<_, GenerationRecord>(
            r#"
            INSERT INTO generations
                (id, user_id, resume_filename, resume_text, job_url, job_text, cover_letter, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.resume_filename)
        .bind(new.resume_text)
        .bind(new.job_url)
        .bind(new.job_text)
        .bind(new.cover_letter)
        .bind(new.language)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_generations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, sqlx::Error> {
        sqlx::query_as::<_, GenerationRecord>(
            "SELECT * FROM generations WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_generation(&self, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM generations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
