//! In-memory `Store` for tests. Insertion order doubles as creation order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::Store;
use crate::models::generation::{GenerationRecord, NewGeneration};
use crate::models::user::{User, UserProfile};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    generations: Mutex<Vec<GenerationRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Makes every later `insert_generation` fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn generations(&self) -> Vec<GenerationRecord> {
        self.generations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.google_id == profile.google_id) {
            if let Some(email) = &profile.email {
                user.email = email.clone();
            }
            if let Some(name) = &profile.name {
                user.name = name.clone();
            }
            if let Some(picture) = &profile.picture {
                user.picture = picture.clone();
            }
            return Ok(user.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            google_id: profile.google_id.clone(),
            email: profile.email.clone().unwrap_or_default(),
            name: profile.name.clone().unwrap_or_default(),
            picture: profile.picture.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert_generation(&self, new: NewGeneration) -> Result<GenerationRecord, sqlx::Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolClosed);
        }
        let record = GenerationRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            resume_filename: new.resume_filename,
            resume_text: new.resume_text,
            job_url: new.job_url,
            job_text: new.job_text,
            cover_letter: new.cover_letter,
            language: new.language,
            created_at: Utc::now(),
        };
        self.generations.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_generations(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, sqlx::Error> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .generations
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|g| g.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn delete_generation(&self, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut generations = self.generations.lock().unwrap();
        let before = generations.len();
        generations.retain(|g| !(g.id == id && g.user_id == user_id));
        Ok(generations.len() < before)
    }
}
