//! Shared helpers for telegram-bot integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, Message, Result, User};
use telegram_bot::BotConfig;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Photo(PathBuf),
    Typing,
}

/// Mock Bot that records every call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn photos(&self) -> Vec<PathBuf> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Photo(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, _chat: &Chat, path: &Path) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Photo(path.to_path_buf()));
        Ok(())
    }

    async fn send_typing(&self, _chat: &Chat) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Typing);
        Ok(())
    }
}

/// Config pointing both upstream services at `server_url`; no env involved.
pub fn test_config(server_url: &str, images_dir: &Path) -> BotConfig {
    BotConfig {
        bot_token: "test_bot_token_12345".to_string(),
        openrouter_api_key: "sk-or-test-key-123456".to_string(),
        neuroimg_api_key: "neuro-test-key".to_string(),
        openrouter_base_url: server_url.to_string(),
        llm_model: "test/model".to_string(),
        neuroimg_api_url: format!("{}/free-generate", server_url),
        telegram_api_url: None,
        images_dir: images_dir.display().to_string(),
        log_file: images_dir.join("bot.log").display().to_string(),
        request_timeout: Duration::from_secs(5),
        image_generation_timeout: Duration::from_secs(5),
        typing_delay: Duration::ZERO,
        image_triggers: vec!["нарисуй".to_string(), "картинка".to_string()],
    }
}

pub fn message(content: &str) -> Message {
    Message {
        id: "msg_1".to_string(),
        user: User {
            id: 123,
            username: Some("user".to_string()),
            first_name: Some("User".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}
