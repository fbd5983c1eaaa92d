//! BotConfig: secrets plus service endpoints, paths, and timeouts. Use `load()` then `validate()`.

use anyhow::Result;
use std::env;
use std::time::Duration;
use tracing::warn;

use image_generation_client::{DEFAULT_DEADLINE, DEFAULT_ENDPOINT};
use image_handlers::DEFAULT_IMAGE_TRIGGERS;
use llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use llm_handlers::DEFAULT_TYPING_DELAY;

pub const DEFAULT_LOG_FILE: &str = "logs/telegram-bot.log";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

const TELEGRAM_TOKEN_PLACEHOLDER: &str = "your_telegram_bot_token_here";
const OPENROUTER_KEY_PLACEHOLDER: &str = "your_openrouter_api_key_here";
const NEUROIMG_KEY_PLACEHOLDER: &str = "your_neuroimg_api_key_here";

/// Immutable process configuration. Secrets that are unset load as empty strings;
/// [`BotConfig::validate`] reports them.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// OPENROUTER_API_KEY
    pub openrouter_api_key: String,
    /// NEUROIMG_API_KEY
    pub neuroimg_api_key: String,
    /// OPENROUTER_BASE_URL
    pub openrouter_base_url: String,
    /// LLM_MODEL
    pub llm_model: String,
    /// NEUROIMG_API_URL
    pub neuroimg_api_url: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub images_dir: String,
    pub log_file: String,
    /// Timeout for the completion call and the image download.
    pub request_timeout: Duration,
    /// Deadline for one streamed image generation.
    pub image_generation_timeout: Duration,
    /// Pause between the typing indicator and the model call.
    pub typing_delay: Duration,
    /// Lower-case substrings that turn a plain message into an image request.
    pub image_triggers: Vec<String>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides TELEGRAM_BOT_TOKEN if provided.
    /// Call `validate()` after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token.unwrap_or_else(|| env_or_default("TELEGRAM_BOT_TOKEN", ""));
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        let image_triggers = match env::var("IMAGE_TRIGGERS") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            _ => DEFAULT_IMAGE_TRIGGERS.iter().map(|t| t.to_string()).collect(),
        };

        Ok(Self {
            bot_token,
            openrouter_api_key: env_or_default("OPENROUTER_API_KEY", ""),
            neuroimg_api_key: env_or_default("NEUROIMG_API_KEY", ""),
            openrouter_base_url: env_or_default("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            llm_model: env_or_default("LLM_MODEL", DEFAULT_MODEL),
            neuroimg_api_url: env_or_default("NEUROIMG_API_URL", DEFAULT_ENDPOINT),
            telegram_api_url,
            images_dir: env_or_default("IMAGES_DIR", DEFAULT_IMAGES_DIR),
            log_file: env_or_default("LOG_FILE", DEFAULT_LOG_FILE),
            request_timeout: Duration::from_secs(env_parse(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            image_generation_timeout: Duration::from_secs(env_parse(
                "IMAGE_GENERATION_TIMEOUT_SECS",
                DEFAULT_DEADLINE.as_secs(),
            )),
            typing_delay: Duration::from_millis(env_parse(
                "TYPING_DELAY_MS",
                DEFAULT_TYPING_DELAY.as_millis() as u64,
            )),
            image_triggers,
        })
    }

    /// Names of the secrets that are empty or still hold their `env.example` placeholder.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        [
            ("TELEGRAM_BOT_TOKEN", self.bot_token.as_str(), TELEGRAM_TOKEN_PLACEHOLDER),
            ("OPENROUTER_API_KEY", self.openrouter_api_key.as_str(), OPENROUTER_KEY_PLACEHOLDER),
            ("NEUROIMG_API_KEY", self.neuroimg_api_key.as_str(), NEUROIMG_KEY_PLACEHOLDER),
        ]
        .into_iter()
        .filter(|(_, value, placeholder)| {
            let value = value.trim();
            value.is_empty() || value == *placeholder
        })
        .map(|(name, _, _)| name)
        .collect()
    }

    /// True when the bot may start. Logs what is wrong otherwise.
    pub fn validate(&self) -> bool {
        let mut ok = true;

        let missing = self.missing_secrets();
        if !missing.is_empty() {
            warn!(
                missing = %missing.join(", "),
                "Required secrets are not set. Create a .env file from env.example and fill them in"
            );
            ok = false;
        }

        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                warn!(
                    url = %url_str,
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL"
                );
                ok = false;
            }
        }

        ok
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
