//! Offline provider used in test mode.

use super::{Completion, Provider, ProviderError, TokenUsage};
use async_trait::async_trait;

/// Answers every prompt by echoing the latest user line. Never touches the
/// network and needs no API key.
#[derive(Debug, Default, Clone)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn complete(
        &self,
        _api_key: Option<&str>,
        prompt: &str,
    ) -> Result<Completion, ProviderError> {
        let last_user_line = prompt
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix("User: "))
            .unwrap_or(prompt.trim());

        Ok(Completion {
            content: format!("Echo: {last_user_line}"),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".into()),
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_last_user_line() {
        let provider = EchoProvider::new();
        let reply = provider
            .complete(None, "User: first\nBot: ok\nUser: second\n")
            .await
            .unwrap();
        assert_eq!(reply.content, "Echo: second");
    }

    #[tokio::test]
    async fn echoes_whole_prompt_without_user_prefix() {
        let reply = EchoProvider.complete(None, "  raw text \n").await.unwrap();
        assert_eq!(reply.content, "Echo: raw text");
    }

    #[test]
    fn needs_no_key() {
        assert!(!EchoProvider.requires_api_key());
        assert_eq!(EchoProvider.name(), "echo");
    }
}
