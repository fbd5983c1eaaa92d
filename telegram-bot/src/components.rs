//! Component factory: builds the teloxide bot, the upstream clients, and the handler chain from config.

use anyhow::{Context, Result};
use dbot_core::Bot as CoreBot;
use handler_chain::HandlerChain;
use image_generation_client::{ImageGenerator, NeuroImgClient};
use image_handlers::{ImageDelivery, ImageGenerationHandler, ImagePipeline};
use llm_client::{mask_token, CompletionClient, LlmClient};
use llm_handlers::QuestionHandler;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::handlers::CommandHandler;
use crate::telegram::TelegramBotAdapter;

/// Everything `run_repl` needs, assembled once per process start.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub handler_chain: HandlerChain,
}

/// teloxide Bot for the configured token; pointed at TELEGRAM_API_URL when set.
pub fn build_teloxide_bot(config: &BotConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    match config.telegram_api_url {
        Some(ref url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let teloxide_bot = build_teloxide_bot(config);
    let bot_adapter: Arc<dyn CoreBot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let handler_chain = build_handler_chain(config, bot_adapter)?;

    Ok(BotComponents {
        teloxide_bot,
        handler_chain,
    })
}

/// Builds the handler chain (commands → image triggers → questions) around `bot`.
#[instrument(skip(config, bot))]
pub fn build_handler_chain(config: &BotConfig, bot: Arc<dyn CoreBot>) -> Result<HandlerChain> {
    // Completion call and image download share one bounded client.
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    // The generation stream can stay open for minutes; its deadline is enforced by the poller.
    let streaming_http = reqwest::Client::builder()
        .connect_timeout(config.request_timeout)
        .build()
        .context("Failed to build streaming HTTP client")?;

    let llm: Arc<dyn LlmClient> = Arc::new(
        CompletionClient::new(
            http.clone(),
            config.openrouter_api_key.clone(),
            &config.openrouter_base_url,
        )
        .with_model(config.llm_model.clone()),
    );
    let generator: Arc<dyn ImageGenerator> = Arc::new(
        NeuroImgClient::new(
            streaming_http,
            config.neuroimg_api_key.clone(),
            config.neuroimg_api_url.clone(),
        )
        .with_deadline(config.image_generation_timeout),
    );

    info!(
        base_url = %config.openrouter_base_url,
        model = %config.llm_model,
        api_key = %mask_token(&config.openrouter_api_key),
        image_endpoint = %config.neuroimg_api_url,
        images_dir = %config.images_dir,
        triggers = ?config.image_triggers,
        "Building handler chain"
    );

    let delivery = ImageDelivery::new(http, bot.clone(), config.images_dir.clone());
    let pipeline = Arc::new(ImagePipeline::new(generator, delivery, bot.clone()));

    Ok(HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(bot.clone(), pipeline.clone())))
        .add_handler(Arc::new(ImageGenerationHandler::new(
            pipeline,
            config.image_triggers.clone(),
        )))
        .add_handler(Arc::new(QuestionHandler::new(llm, bot, config.typing_delay))))
}
