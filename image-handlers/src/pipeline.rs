//! Generate → (notify) → deliver, shared by `/draw` and the trigger-word route.

use std::sync::Arc;

use dbot_core::{Bot, Chat};
use image_generation_client::ImageGenerator;
use tracing::{error, info, instrument, warn};

use crate::delivery::{DeliveryOutcome, ImageDelivery};
use crate::notify;

/// User-facing texts for one route into the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineMessages {
    /// Sent before generation starts.
    pub started: &'static str,
    /// Sent once a URL is known, before downloading. `None` skips it.
    pub ready: Option<&'static str>,
    /// Sent when the service produced no image.
    pub not_generated: &'static str,
    /// Prefix for generation errors; the error text follows after `": "`.
    pub error_prefix: &'static str,
}

impl PipelineMessages {
    /// Texts for the `/draw` command.
    pub const DRAW_COMMAND: Self = Self {
        started: "🎨 Starting image generation...",
        ready: Some("✅ Image is ready! Downloading..."),
        not_generated: "❌ Could not generate the image. Try again or change the description.",
        error_prefix: "❌ Generation error",
    };

    /// Texts for plain messages that contain a trigger word.
    pub const TRIGGER_PHRASE: Self = Self {
        started: "Okay! Drawing a picture for you now...",
        ready: None,
        not_generated: "Couldn't draw the picture 🙁",
        error_prefix: "❌ Generation error",
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Delivered(DeliveryOutcome),
    NotGenerated,
    GenerationFailed,
}

pub struct ImagePipeline {
    generator: Arc<dyn ImageGenerator>,
    delivery: ImageDelivery,
    bot: Arc<dyn Bot>,
}

impl ImagePipeline {
    pub fn new(generator: Arc<dyn ImageGenerator>, delivery: ImageDelivery, bot: Arc<dyn Bot>) -> Self {
        Self {
            generator,
            delivery,
            bot,
        }
    }

    #[instrument(skip(self, chat, description, messages), fields(chat_id = chat.id))]
    pub async fn run(
        &self,
        chat: &Chat,
        description: &str,
        messages: &PipelineMessages,
    ) -> PipelineOutcome {
        info!(
            prompt_preview = %description.chars().take(50).collect::<String>(),
            "Processing image generation request"
        );
        notify(self.bot.as_ref(), chat, messages.started).await;

        match self.generator.generate(description).await {
            Ok(Some(url)) => {
                if let Some(ready) = messages.ready {
                    notify(self.bot.as_ref(), chat, ready).await;
                }
                PipelineOutcome::Delivered(self.delivery.deliver(chat, &url).await)
            }
            Ok(None) => {
                warn!("Image generation produced no image");
                notify(self.bot.as_ref(), chat, messages.not_generated).await;
                PipelineOutcome::NotGenerated
            }
            Err(e) => {
                error!(error = %e, "Image generation failed");
                notify(
                    self.bot.as_ref(),
                    chat,
                    &format!("{}: {}", messages.error_prefix, e),
                )
                .await;
                PipelineOutcome::GenerationFailed
            }
        }
    }
}
