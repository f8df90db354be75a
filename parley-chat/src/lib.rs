//! parley-chat - Web chat front-end for a remote completion API.
//!
//! Keeps one rolling conversation bounded by a token or character budget,
//! forwards it to an OpenAI-compatible endpoint and renders the reply as
//! markup for the bundled chat page.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod cli;
pub mod context;
pub mod credential;
pub mod error;
pub mod format;
pub mod page;
pub mod provider;
pub mod routes;
pub mod service;
pub mod tokenizer;

pub use cli::Args;
pub use context::{append_and_trim, Conversation};
pub use credential::CredentialStore;
pub use error::ChatError;
pub use format::{format_response, LANGUAGE_TAGS};
pub use provider::{CompatibleProvider, Completion, EchoProvider, Provider, ProviderError};
pub use routes::{build_router, AppState};
pub use service::{ChatService, SendOutcome, MISSING_API_KEY_MESSAGE};
pub use tokenizer::{BpeTokenizer, Tokenizer};
