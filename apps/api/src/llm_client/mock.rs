//! Deterministic `ChatModel` for tests. No network calls.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, ChatModel, Completion, LlmError, StreamEvent, TokenUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Immediately,
    MidStream,
}

/// Replies with a fixed text. Streaming splits it into word tokens that keep
/// their trailing whitespace, so the tokens concatenate back to the reply.
pub struct StubModel {
    reply: String,
    failure: Option<Failure>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call before producing anything.
    pub fn failing() -> Self {
        Self {
            failure: Some(Failure::Immediately),
            ..Self::replying("")
        }
    }

    /// Streams the first half of `reply`, then fails.
    pub fn failing_mid_stream(reply: &str) -> Self {
        Self {
            failure: Some(Failure::MidStream),
            ..Self::replying(reply)
        }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.reply.split_inclusive(' ').map(String::from).collect()
    }

    /// Messages of the most recent call.
    pub fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn usage() -> TokenUsage {
        TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
            cached_tokens: 80,
            cache_creation_tokens: 0,
        }
    }

    fn provider_error() -> LlmError {
        LlmError::Api("LLM down".to_string())
    }
}

#[async_trait]
impl ChatModel for StubModel {
    fn model(&self) -> &str {
        "stub"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.failure.is_some() {
            return Err(Self::provider_error());
        }
        Ok(Completion {
            text: self.reply.clone(),
            usage: Some(Self::usage()),
        })
    }

    async fn stream(&self, messages: Vec<ChatMessage>, tx: mpsc::Sender<StreamEvent>) {
        self.calls.lock().unwrap().push(messages);

        let tokens = self.tokens();
        let emitted = match self.failure {
            Some(Failure::Immediately) => 0,
            Some(Failure::MidStream) => tokens.len() / 2,
            None => tokens.len(),
        };
        for token in tokens.into_iter().take(emitted) {
            let _ = tx.send(StreamEvent::Token(token)).await;
        }

        let terminal = match self.failure {
            Some(_) => StreamEvent::Failed(Self::provider_error()),
            None => StreamEvent::Done(Some(Self::usage())),
        };
        let _ = tx.send(terminal).await;
    }
}
