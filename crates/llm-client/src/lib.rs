//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and [`CompletionClient`], a chat-completion client for
//! OpenRouter-compatible endpoints. `ask` never fails: every error path becomes a readable string
//! that can be sent to the chat as-is.

use async_trait::async_trait;

mod completion;
mod error;

pub use completion::{extract_content, CompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::CompletionError;

/// LLM client interface used by the question handler.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply, or a description of what went wrong.
    async fn ask(&self, prompt: &str) -> String;
}

/// Masks an API key for logging: first 7 + "***" + last 4 chars; keys of 11 chars or fewer become "***".
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
