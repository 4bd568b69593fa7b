//! LLM Client: the single point of entry for chat-model calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model provider directly.
//! Everything goes through the `ChatModel` trait; `OpenAiClient` is the
//! production backend and speaks the OpenAI Chat Completions protocol, so any
//! compatible base URL works.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionStreamOptions, CompletionUsage,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[cfg(test)]
pub mod mock;

/// Sampling temperature for every call.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("stream closed before completion")]
    StreamClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Token accounting reported by the provider, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cached_tokens: u32,
    pub cache_creation_tokens: u32,
}

impl From<CompletionUsage> for TokenUsage {
    fn from(usage: CompletionUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            cached_tokens: usage
                .prompt_tokens_details
                .and_then(|d| d.cached_tokens)
                .unwrap_or_default(),
            // Not reported by the Chat Completions API.
            cache_creation_tokens: 0,
        }
    }
}

/// A finished, non-streamed answer.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// What a streaming call pushes onto its channel. A stream is any number of
/// `Token`s followed by exactly one `Done` or `Failed`.
#[derive(Debug)]
pub enum StreamEvent {
    Token(String),
    Done(Option<TokenUsage>),
    Failed(LlmError),
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError>;

    /// Produces tokens into `tx` as they arrive. Always ends with a terminal
    /// event; a dropped receiver does not stop production.
    async fn stream(&self, messages: Vec<ChatMessage>, tx: mpsc::Sender<StreamEvent>);
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible backend
// ────────────────────────────────────────────────────────────────────────────

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    /// No request timeout is set: long generations are allowed to finish.
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url.trim_end_matches('/'));

        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn to_openai_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
        let built: Result<ChatCompletionRequestMessage, _> = match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into),
        };
        built.map_err(|e| LlmError::Api(format!("Failed to build message: {e}")))
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<CreateChatCompletionRequest, LlmError> {
        let messages = messages
            .iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE);
        if stream {
            builder.stream_options(ChatCompletionStreamOptions {
                include_usage: true,
            });
        }
        builder.build().map_err(|e| LlmError::Api(e.to_string()))
    }

    /// Drives one streaming response to its end, forwarding content deltas.
    async fn pump(
        &self,
        messages: &[ChatMessage],
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<Option<TokenUsage>, LlmError> {
        let request = self.build_request(messages, true)?;
        let mut chunks = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let mut usage = None;
        let mut finished = false;

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                // Some providers drop the connection right after the final chunk.
                Err(e) if finished => {
                    debug!("LLM stream ended after finish: {e}");
                    break;
                }
                Err(e) => {
                    warn!("LLM stream failed: {e}");
                    return Err(LlmError::Api(e.to_string()));
                }
            };

            if let Some(reported) = chunk.usage {
                usage = Some(TokenUsage::from(reported));
            }
            for choice in chunk.choices {
                finished |= choice.finish_reason.is_some();
                if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                    // Keep producing even if the consumer went away.
                    let _ = tx.send(StreamEvent::Token(content)).await;
                }
            }
        }

        if finished {
            Ok(usage)
        } else {
            Err(LlmError::StreamClosed)
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
        let request = self.build_request(messages, false)?;
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API call failed: {e}");
            LlmError::Api(e.to_string())
        })?;
        let usage = response.usage.map(TokenUsage::from);

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: {} chars, usage={usage:?}", text.len());
        Ok(Completion { text, usage })
    }

    async fn stream(&self, messages: Vec<ChatMessage>, tx: mpsc::Sender<StreamEvent>) {
        let terminal = match self.pump(&messages, &tx).await {
            Ok(usage) => {
                debug!("LLM stream finished, usage={usage:?}");
                StreamEvent::Done(usage)
            }
            Err(e) => StreamEvent::Failed(e),
        };
        let _ = tx.send(terminal).await;
    }
}
