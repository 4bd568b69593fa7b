//! Letter writer: prompt assembly plus the model call, blocking or streamed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::error::GenerationError;
use super::prompts::build_messages;
use crate::llm_client::{ChatModel, StreamEvent, TokenUsage};

/// Buffer between the model task and its consumer.
const STREAM_BUFFER: usize = 64;

#[derive(Clone)]
pub struct LetterWriter {
    model: Arc<dyn ChatModel>,
}

impl LetterWriter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn write(
        &self,
        resume_text: &str,
        job_description: &str,
        language: &str,
    ) -> Result<String, GenerationError> {
        self.log_start(resume_text, job_description, language);
        let messages = build_messages(resume_text, job_description, language);

        let completion = self.model.complete(&messages).await.map_err(|e| {
            error!("LLM call failed: {e}");
            GenerationError::ModelInvocationFailed(e)
        })?;
        log_usage(completion.usage);
        Ok(completion.text)
    }

    /// Starts the model on its own task and returns the receiving end.
    /// The task keeps running if the receiver is dropped.
    pub fn write_stream(
        &self,
        resume_text: &str,
        job_description: &str,
        language: &str,
    ) -> mpsc::Receiver<StreamEvent> {
        self.log_start(resume_text, job_description, language);
        let messages = build_messages(resume_text, job_description, language);

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let model = Arc::clone(&self.model);
        tokio::spawn(async move {
            model.stream(messages, tx).await;
        });
        rx
    }

    fn log_start(&self, resume_text: &str, job_description: &str, language: &str) {
        info!(
            "Generating cover letter (model={}, lang={language}, resume={} chars, job={} chars)",
            self.model.model(),
            resume_text.chars().count(),
            job_description.chars().count()
        );
    }
}

pub fn log_usage(usage: Option<TokenUsage>) {
    match usage {
        Some(u) => info!(
            "Token usage: input={}, output={}, cached={}, cache_creation={}",
            u.input_tokens, u.output_tokens, u.cached_tokens, u.cache_creation_tokens
        ),
        None => debug!("Provider reported no token usage"),
    }
}
