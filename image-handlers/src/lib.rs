//! # image-handlers
//!
//! Everything after the user asked for a picture: generating it ([`ImagePipeline`]), downloading
//! and sending the result ([`ImageDelivery`]), and the trigger-word route ([`ImageGenerationHandler`]).

mod delivery;
mod image_generation_handler;
mod pipeline;

pub use delivery::{image_file_name, save_image, DeliveryError, DeliveryOutcome, ImageDelivery};
pub use image_generation_handler::{ImageGenerationHandler, DEFAULT_IMAGE_TRIGGERS};
pub use pipeline::{ImagePipeline, PipelineMessages, PipelineOutcome};

use dbot_core::{Bot, Chat};
use tracing::error;

/// Sends a text message; a failure is logged and otherwise ignored.
pub(crate) async fn notify(bot: &dyn Bot, chat: &Chat, text: &str) {
    if let Err(e) = bot.send_message(chat, text).await {
        error!(error = %e, chat_id = chat.id, "Failed to send message");
    }
}
