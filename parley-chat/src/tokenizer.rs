//! Token counting for the token-budget context mode.
//!
//! Uses the tiktoken `cl100k_base` encoding. The remote model has its own
//! tokenizer, so counts here are an approximation suitable for budgeting.

use std::sync::Arc;

use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::error::ChatError;

/// Tokenizer used to measure and cut the conversation context.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;

    /// The longest suffix of `text` that fits in `budget` tokens.
    ///
    /// Cuts on token boundaries, not turn or word boundaries.
    fn keep_last_tokens(&self, text: &str, budget: usize) -> String;
}

/// BPE tokenizer backed by tiktoken.
#[derive(Clone)]
pub struct BpeTokenizer {
    bpe: Arc<CoreBPE>,
}

impl BpeTokenizer {
    /// Load the `cl100k_base` encoding.
    pub fn cl100k() -> Result<Self, ChatError> {
        let bpe = cl100k_base().map_err(|e| ChatError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl Tokenizer for BpeTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn keep_last_tokens(&self, text: &str, budget: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= budget {
            return text.to_string();
        }

        // A cut can land inside a multi-byte character, and a decoded suffix
        // can re-encode to more tokens than it was cut from. Drop leading
        // tokens until the suffix decodes and fits.
        let mut start = tokens.len() - budget;
        while start < tokens.len() {
            if let Ok(kept) = self.bpe.decode(tokens[start..].to_vec()) {
                if self.count_tokens(&kept) <= budget {
                    return kept;
                }
            }
            start += 1;
        }

        String::new()
    }
}
