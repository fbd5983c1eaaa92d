//! Test doubles shared by the image-handlers integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, DbotError, Message, Result, User};
use image_generation_client::{ImageGenerationError, ImageGenerator};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(i64, String),
    Photo(i64, PathBuf),
    Typing(i64),
}

/// Mock Bot that records every call; optionally fails photo uploads.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
    fail_photos: bool,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_photos() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_photos: true,
        })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn photos(&self) -> Vec<PathBuf> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Photo(_, path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Text(chat.id, text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, path: &Path) -> Result<()> {
        if self.fail_photos {
            return Err(DbotError::Bot("photo upload rejected".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Photo(chat.id, path.to_path_buf()));
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Typing(chat.id));
        Ok(())
    }
}

type Outcome = Box<dyn Fn() -> std::result::Result<Option<String>, ImageGenerationError> + Send + Sync>;

/// Generator stub with a fixed outcome; counts calls and keeps the prompts it saw.
pub struct StubGenerator {
    outcome: Outcome,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn returning(url: Option<&str>) -> Arc<Self> {
        let url = url.map(str::to_string);
        Arc::new(Self {
            outcome: Box::new(move || Ok(url.clone())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            outcome: Box::new(move || {
                Err(ImageGenerationError::Status {
                    status,
                    body: "boom".to_string(),
                })
            }),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(
        &self,
        description: &str,
    ) -> std::result::Result<Option<String>, ImageGenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(description.to_string());
        (self.outcome)()
    }
}

pub fn chat() -> Chat {
    Chat {
        id: 456,
        chat_type: "private".to_string(),
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
        chat: chat(),
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

/// Lists regular files in `dir`; empty if the directory does not exist.
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    }
}
