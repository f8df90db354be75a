//! Rolling conversation context.
//!
//! The conversation is an ordered list of turns (`"User: ...\n"`,
//! `"Bot: ...\n"`). Every append trims from the oldest end so the joined
//! text stays within the configured budget:
//!
//! - **Token mode** joins everything, keeps the last `budget` tokens and
//!   replaces the whole history with that single string.
//! - **Char mode** drops whole turns from the front until the joined length
//!   fits. A lone turn that is itself over budget is kept as-is.

use std::collections::VecDeque;
use std::sync::Arc;

use parley_common::ContextMode;

use crate::tokenizer::Tokenizer;

/// Append `new_turn` to `turns` and trim to the budget of `mode`.
pub fn append_and_trim(
    turns: &mut VecDeque<String>,
    new_turn: &str,
    mode: ContextMode,
    tokenizer: &dyn Tokenizer,
) {
    match mode {
        ContextMode::Tokens(budget) => {
            let mut joined: String = turns.iter().map(String::as_str).collect();
            joined.push_str(new_turn);
            let kept = tokenizer.keep_last_tokens(&joined, budget);
            turns.clear();
            turns.push_back(kept);
        }
        ContextMode::Chars(budget) => {
            turns.push_back(new_turn.to_string());
            let mut total: usize = turns.iter().map(|t| t.chars().count()).sum();
            while total > budget && turns.len() > 1 {
                if let Some(evicted) = turns.pop_front() {
                    total -= evicted.chars().count();
                }
            }
        }
    }
}

/// The single shared conversation held by the server.
pub struct Conversation {
    turns: VecDeque<String>,
    mode: ContextMode,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new(mode: ContextMode, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            turns: VecDeque::new(),
            mode,
            tokenizer,
        }
    }

    /// Append a turn and trim to budget.
    pub fn push(&mut self, turn: &str) {
        append_and_trim(&mut self.turns, turn, self.mode, self.tokenizer.as_ref());
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The full prompt sent upstream.
    pub fn joined(&self) -> String {
        self.turns.iter().map(String::as_str).collect()
    }

    pub fn turns(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn mode(&self) -> ContextMode {
        self.mode
    }

    /// Current size in the unit of the configured mode.
    pub fn size(&self) -> usize {
        match self.mode {
            ContextMode::Tokens(_) => self.tokenizer.count_tokens(&self.joined()),
            ContextMode::Chars(_) => self.turns.iter().map(|t| t.chars().count()).sum(),
        }
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("turns", &self.turns.len())
            .field("mode", &self.mode)
            .finish()
    }
}
