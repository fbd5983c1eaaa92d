//! Bot abstraction for outbound chat operations.
//!
//! [`Bot`] is transport-agnostic; telegram-bot implements it via teloxide and tests substitute recording mocks.

use crate::error::Result;
use crate::types::Chat;
use async_trait::async_trait;
use std::path::Path;

/// Outbound operations the handlers need. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Uploads a local image file to the chat as a photo.
    async fn send_photo(&self, chat: &Chat, path: &Path) -> Result<()>;
    /// Shows the "typing" chat action.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}
