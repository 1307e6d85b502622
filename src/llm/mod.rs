// LLM boundary
//
// The pipeline only ever sees the TextGenerator trait; the concrete
// Anthropic client lives in `anthropic` and is swapped out for a mock
// in tests.

pub mod anthropic;

use async_trait::async_trait;
use thiserror::Error;

pub use anthropic::AnthropicClient;

/// Errors from text generation
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no text content")]
    EmptyCompletion,

    #[error("missing API key: {0}")]
    MissingApiKey(&'static str),
}

/// One completed generation call: the text plus token accounting
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Completion {
    /// Combined input + output tokens, the number the usage tracker records
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Capability to turn a prompt into generated text
///
/// Implemented by `AnthropicClient` in production. Failures propagate to
/// the pipeline verbatim; retry is the caller's concern, not this trait's.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion call against the backing model
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError>;

    /// Model name used for usage accounting
    fn model(&self) -> &str;
}
