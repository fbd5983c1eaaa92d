//! `/start`, `/help` and `/draw`. Every message that starts with `/` ends here.

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use image_handlers::{ImagePipeline, PipelineMessages};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shortest `/draw` description accepted, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 3;

pub const START_TEXT: &str = "\
🎉 Hi! I'm a smart bot with artificial intelligence!

🤖 What I can do:
• Answer any question
• Generate pictures from a description

📝 Commands:
/start - this message
/draw [description] - draw a picture
/help - show help

💡 Examples:
/draw a beautiful cat at sunset
/draw a spaceship in anime style
/draw a portrait of a man in the style of Van Gogh

Just send me any question or use the /draw command to create a picture!";

pub const HELP_TEXT: &str = "\
🤖 How to use the bot:

📝 Commands:
/start - greeting and overview
/draw [description] - generate a picture from a description
/help - this help

🎨 Picture generation:
• Use the /draw command with a description
• The description can be in Russian or English
• The more detailed the description, the better the result

💬 Chat with AI:
• Just write any question
• The bot answers using a neural network

⚠️ Limitations:
• Picture generation can take a while
• Some requests may be rejected
• Images are stored temporarily";

pub const DRAW_USAGE_TEXT: &str = "\
❌ Please provide a description of the picture!

Example: /draw a beautiful cat at sunset
Or: /draw a spaceship in anime style";

pub const DRAW_TOO_SHORT_TEXT: &str =
    "❌ The description is too short. Please describe in more detail what you want to draw.";

/// Splits `/cmd@botname rest` into (`cmd`, `rest`). `None` if `text` is not a command.
/// `rest` is everything after the first whitespace, untrimmed.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('/')?;
    let (token, rest) = match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], &body[pos..]),
        None => (body, ""),
    };
    let command = token.split('@').next().unwrap_or(token);
    Some((command, rest))
}

/// Fixed-text commands and `/draw`. Unknown commands are dropped so they never reach the model.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    pipeline: Arc<ImagePipeline>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, pipeline: Arc<ImagePipeline>) -> Self {
        Self { bot, pipeline }
    }

    async fn reply(&self, message: &Message, text: &str) {
        if let Err(e) = self.bot.send_message(&message.chat, text).await {
            error!(error = %e, chat_id = message.chat.id, "Failed to send command reply");
        }
    }

    async fn draw(&self, message: &Message, rest: &str) {
        let description = rest.trim();
        if description.is_empty() {
            self.reply(message, DRAW_USAGE_TEXT).await;
            return;
        }
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            self.reply(message, DRAW_TOO_SHORT_TEXT).await;
            return;
        }
        self.pipeline
            .run(&message.chat, description, &PipelineMessages::DRAW_COMMAND)
            .await;
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((command, rest)) = parse_command(message.content.trim_start()) else {
            return Ok(HandlerResponse::Continue);
        };

        info!(command = %command, "Command received");
        match command {
            "start" => self.reply(message, START_TEXT).await,
            "help" => self.reply(message, HELP_TEXT).await,
            "draw" => self.draw(message, rest).await,
            other => info!(command = %other, "Unknown command ignored"),
        }
        Ok(HandlerResponse::Stop)
    }
}
