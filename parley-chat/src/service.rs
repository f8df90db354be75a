//! Chat orchestration: context, credential check, inference, formatting.

use std::sync::Arc;

use parley_common::logging::{generate_request_id, request_span};
use parley_common::ContextMode;
use tokio::sync::Mutex;
use tracing::Instrument;

use crate::context::Conversation;
use crate::credential::CredentialStore;
use crate::format::{escape_html, format_response};
use crate::provider::Provider;

/// Reply sent instead of calling the API when no key is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "API Key not set. Please enter your Cerebras API Key.";

/// Result of one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Formatted bot turn, `"Bot: ...\n"`.
    Reply(String),
    /// No API key configured; nothing was sent upstream.
    MissingApiKey,
    /// The provider call failed; holds the HTML-escaped error text.
    Failed(String),
}

impl SendOutcome {
    /// Text returned to the HTTP caller.
    pub fn body(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Failed(text) => text,
            Self::MissingApiKey => MISSING_API_KEY_MESSAGE,
        }
    }
}

/// Owns the shared conversation, the API key and the provider.
pub struct ChatService {
    conversation: Mutex<Conversation>,
    context: ContextMode,
    credentials: CredentialStore,
    provider: Arc<dyn Provider>,
}

impl ChatService {
    pub fn new(
        conversation: Conversation,
        credentials: CredentialStore,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self {
            context: conversation.mode(),
            conversation: Mutex::new(conversation),
            credentials,
            provider,
        }
    }

    /// Handle one user message.
    ///
    /// The user turn is recorded before the key check, so a missing key or a
    /// failed call still leaves the prompt in the context. The conversation
    /// lock is held for the whole exchange, serializing concurrent senders.
    pub async fn send(&self, prompt: &str) -> SendOutcome {
        let span = request_span(&generate_request_id());
        self.exchange(prompt).instrument(span).await
    }

    async fn exchange(&self, prompt: &str) -> SendOutcome {
        let mut conversation = self.conversation.lock().await;

        conversation.push(&format!("User: {prompt}\n"));
        let full_prompt = conversation.joined();

        tracing::debug!(
            turns = conversation.len(),
            size = conversation.size(),
            unit = conversation.mode().unit(),
            "Context updated"
        );

        let api_key = self.credentials.get().await;
        if api_key.is_none() && self.provider.requires_api_key() {
            tracing::warn!("API key not set, skipping inference");
            return SendOutcome::MissingApiKey;
        }

        match self.provider.complete(api_key.as_deref(), &full_prompt).await {
            Ok(completion) => {
                tracing::info!(
                    provider = self.provider.name(),
                    model = self.provider.model(),
                    latency_ms = completion.latency_ms,
                    total_tokens = completion.usage.total_tokens,
                    "Inference completed"
                );

                let reply = format!("Bot: {}\n", format_response(&completion.content));
                conversation.push(&reply);
                SendOutcome::Reply(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Inference failed");
                // Upstream bodies end up in the page markup too.
                SendOutcome::Failed(escape_html(&e.to_string()))
            }
        }
    }

    /// Drop the whole conversation.
    pub async fn clear(&self) {
        self.conversation.lock().await.clear();
        tracing::info!("Conversation cleared");
    }

    /// Snapshot of the current turns.
    pub async fn turns(&self) -> Vec<String> {
        self.conversation
            .lock()
            .await
            .turns()
            .map(str::to_string)
            .collect()
    }

    /// Fixed at construction; readable while a send holds the conversation.
    pub fn context_mode(&self) -> ContextMode {
        self.context
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }
}
