//! # Telegram bot application
//!
//! Answers questions with an LLM and draws pictures on request. Wires handler-chain,
//! llm-handlers and image-handlers over a teloxide transport; config comes from the environment.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod supervisor;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, build_teloxide_bot, BotComponents};
pub use config::BotConfig;
pub use handlers::CommandHandler;
pub use runner::run_bot;
pub use supervisor::{supervise, RestartPolicy};
pub use telegram::{process_message, run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
