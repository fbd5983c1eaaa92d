//! Bot configuration, loaded once from the environment at startup.

mod bot_config;


pub use bot_config::{
    BotConfig, DEFAULT_IMAGES_DIR, DEFAULT_LOG_FILE, DEFAULT_REQUEST_TIMEOUT_SECS,
};
