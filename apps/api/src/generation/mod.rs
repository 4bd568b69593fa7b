// Cover letter generation: resume + job description → letter, blocking or
// streamed. All model calls go through llm_client.

pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod stream;
pub mod writer;
