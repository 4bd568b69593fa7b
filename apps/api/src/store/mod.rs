//! History store: users and their past generations.
//!
//! Handlers and the pipeline depend on `Arc<dyn Store>`; `PgStore` is the
//! production backend.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::generation::{GenerationRecord, NewGeneration};
use crate::models::user::{User, UserProfile};

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts the user or refreshes email/name/picture, keyed by Google id.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, sqlx::Error>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;

    async fn insert_generation(&self, new: NewGeneration) -> Result<GenerationRecord, sqlx::Error>;

    /// Newest first, at most `limit` rows.
    async fn list_generations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, sqlx::Error>;

    /// Deletes one record if `user_id` owns it. Returns whether a row went away.
    async fn delete_generation(&self, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error>;
}
