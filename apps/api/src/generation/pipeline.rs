//! Generation orchestrator: extract → resolve → write → record.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use super::error::GenerationError;
use super::stream::StreamFrame;
use super::writer::{log_usage, LetterWriter};
use crate::job_posting::JobResolver;
use crate::llm_client::{LlmError, StreamEvent};
use crate::models::generation::NewGeneration;
use crate::resume::ResumeExtractor;
use crate::store::Store;

const FRAME_BUFFER: usize = 64;

/// Raw request inputs, as read from the multipart form.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub resume: Bytes,
    pub filename: String,
    pub job_url: Option<String>,
    pub job_text: Option<String>,
    pub language: String,
}

/// Everything the model needs, validated. Also the body of the history record.
#[derive(Debug, Clone)]
struct PreparedGeneration {
    filename: String,
    resume_text: String,
    job_url: Option<String>,
    job_description: String,
    language: String,
}

impl PreparedGeneration {
    fn into_record(self, user_id: Uuid, cover_letter: String) -> NewGeneration {
        NewGeneration {
            user_id,
            resume_filename: self.filename,
            resume_text: self.resume_text,
            job_url: self.job_url,
            job_text: self.job_description,
            cover_letter,
            language: self.language,
        }
    }
}

pub struct Pipeline {
    extractor: ResumeExtractor,
    resolver: JobResolver,
    writer: LetterWriter,
    store: Arc<dyn Store>,
}

impl Pipeline {
    pub fn new(
        extractor: ResumeExtractor,
        resolver: JobResolver,
        writer: LetterWriter,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            extractor,
            resolver,
            writer,
            store,
        }
    }

    async fn prepare(&self, input: GenerationInput) -> Result<PreparedGeneration, GenerationError> {
        let resume_text = self
            .extractor
            .extract(input.resume, &input.filename)
            .await?;
        if resume_text.trim().is_empty() {
            return Err(GenerationError::EmptyResume);
        }

        let job_description = self
            .resolver
            .resolve(input.job_url.as_deref(), input.job_text.as_deref())
            .await?;

        Ok(PreparedGeneration {
            filename: input.filename,
            resume_text,
            job_url: input.job_url,
            job_description,
            language: input.language,
        })
    }

    /// Produces the whole letter. When `user_id` is set the result is also
    /// recorded in that user's history.
    pub async fn generate(
        &self,
        input: GenerationInput,
        user_id: Option<Uuid>,
    ) -> Result<String, GenerationError> {
        let prepared = self.prepare(input).await?;
        let letter = self
            .writer
            .write(
                &prepared.resume_text,
                &prepared.job_description,
                &prepared.language,
            )
            .await?;

        if let Some(user_id) = user_id {
            record(self.store.as_ref(), prepared.into_record(user_id, letter.clone())).await;
        }
        Ok(letter)
    }

    /// Validates inputs up front, then streams the letter as frames.
    ///
    /// Errors returned here happen before any output. Once the receiver is
    /// handed out, model failures arrive as a final `StreamFrame::Error`. The
    /// forwarding task runs to completion even if the receiver is dropped, so
    /// a finished letter is still recorded.
    pub async fn generate_stream(
        &self,
        input: GenerationInput,
        user_id: Option<Uuid>,
    ) -> Result<mpsc::Receiver<StreamFrame>, GenerationError> {
        let prepared = self.prepare(input).await?;
        let mut events = self.writer.write_stream(
            &prepared.resume_text,
            &prepared.job_description,
            &prepared.language,
        );

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let mut letter = String::new();
            let terminal = loop {
                match events.recv().await {
                    Some(StreamEvent::Token(token)) => {
                        letter.push_str(&token);
                        let _ = tx.send(StreamFrame::Token(token)).await;
                    }
                    Some(StreamEvent::Done(usage)) => {
                        log_usage(usage);
                        info!("Streamed cover letter ({} chars)", letter.chars().count());
                        if let Some(user_id) = user_id {
                            record(store.as_ref(), prepared.into_record(user_id, letter)).await;
                        }
                        break StreamFrame::Done;
                    }
                    Some(StreamEvent::Failed(e)) => break failure_frame(e),
                    None => break failure_frame(LlmError::StreamClosed),
                }
            };
            let _ = tx.send(terminal).await;
        });

        Ok(rx)
    }
}

fn failure_frame(e: LlmError) -> StreamFrame {
    error!("LLM stream failed: {e}");
    StreamFrame::Error(GenerationError::ModelInvocationFailed(e).to_string())
}

/// Best-effort history write. Failures are logged and swallowed.
async fn record(store: &dyn Store, new: NewGeneration) {
    let user_id = new.user_id;
    match store.insert_generation(new).await {
        Ok(saved) => info!("Saved generation {} for user {user_id}", saved.id),
        Err(e) => error!("Failed to save generation for user {user_id}: {e}"),
    }
}
