//! Image request handler: plain messages containing a trigger word are drawn instead of answered.

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::pipeline::{ImagePipeline, PipelineMessages};

/// Default trigger substrings ("draw", "picture").
pub const DEFAULT_IMAGE_TRIGGERS: &[&str] = &["нарисуй", "картинка"];

/// Routes messages that mention a trigger word to the image pipeline. The whole message text is used
/// as the description. Commands are never taken here, even if they contain a trigger word.
#[derive(Clone)]
pub struct ImageGenerationHandler {
    triggers: Vec<String>,
    pipeline: Arc<ImagePipeline>,
}

impl ImageGenerationHandler {
    pub fn new(pipeline: Arc<ImagePipeline>, triggers: Vec<String>) -> Self {
        let triggers = triggers
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { triggers, pipeline }
    }

    /// True when the lower-cased text contains any trigger.
    pub fn is_image_generation_request(&self, text: &str) -> bool {
        let text_lower = text.to_lowercase();
        self.triggers
            .iter()
            .any(|trigger| text_lower.contains(trigger.as_str()))
    }
}

#[async_trait]
impl Handler for ImageGenerationHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.is_empty() || message.content.starts_with('/') {
            return Ok(HandlerResponse::Continue);
        }
        if !self.is_image_generation_request(&message.content) {
            return Ok(HandlerResponse::Continue);
        }

        debug!(chat_id = message.chat.id, "Trigger word found, drawing");
        self.pipeline
            .run(&message.chat, &message.content, &PipelineMessages::TRIGGER_PHRASE)
            .await;
        Ok(HandlerResponse::Stop)
    }
}
