//! Fallback route: every plain text message is a question for the model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use llm_client::LlmClient;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(2000);

/// Shows "typing…", waits `typing_delay`, asks the model and sends whatever `ask` returned.
///
/// `ask` never fails (errors come back as display text), so every non-empty message gets exactly
/// one reply.
pub struct QuestionHandler {
    llm: Arc<dyn LlmClient>,
    bot: Arc<dyn Bot>,
    typing_delay: Duration,
}

impl QuestionHandler {
    pub fn new(llm: Arc<dyn LlmClient>, bot: Arc<dyn Bot>, typing_delay: Duration) -> Self {
        Self {
            llm,
            bot,
            typing_delay,
        }
    }
}

#[async_trait]
impl Handler for QuestionHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_empty() {
            return Ok(HandlerResponse::Continue);
        }

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, "Failed to send typing indicator");
        }
        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        let answer = self.llm.ask(&message.content).await;
        info!(answer_len = answer.chars().count(), "Answer ready");

        if let Err(e) = self.bot.send_message(&message.chat, &answer).await {
            error!(error = %e, "Failed to send answer");
        }
        Ok(HandlerResponse::Reply(answer))
    }
}
