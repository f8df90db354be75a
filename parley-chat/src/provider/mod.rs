//! Inference providers.
//!
//! A provider turns the accumulated conversation text into one completion.
//! The HTTP provider talks to any OpenAI-compatible `/v1/chat/completions`
//! endpoint; the echo provider answers locally for test mode.

mod compatible;
mod echo;

pub use compatible::CompatibleProvider;
pub use echo::EchoProvider;

use async_trait::async_trait;

/// LLM completion backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "cerebras", "echo").
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Whether an API key must be set before calling [`Provider::complete`].
    fn requires_api_key(&self) -> bool {
        true
    }

    /// Send `prompt` as a single user message and return the reply.
    async fn complete(
        &self,
        api_key: Option<&str>,
        prompt: &str,
    ) -> Result<Completion, ProviderError>;
}

/// Error from a provider.
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub provider: String,
    pub model: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.provider, self.model, self.message)
    }
}

impl std::error::Error for ProviderError {}

/// A completed reply.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Reply text
    pub content: String,
    /// Token usage reported by the API
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Token usage information.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub total_tokens: i64,
}
