//! Download a generated image, keep a copy on disk, and send it to the chat.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use dbot_core::{Bot, Chat, DbotError};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument, warn};

use crate::notify;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Bot(#[from] DbotError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Saved to this path and sent as a photo.
    Sent(PathBuf),
    /// The image host answered with a non-200 status; the user was told.
    DownloadFailed(u16),
    /// Something else broke; the user got a generic processing-error message.
    Failed,
}

/// Fetch-and-deliver step. Owns the directory where generated images are kept.
#[derive(Clone)]
pub struct ImageDelivery {
    http: reqwest::Client,
    bot: Arc<dyn Bot>,
    images_dir: PathBuf,
}

impl ImageDelivery {
    pub fn new(http: reqwest::Client, bot: Arc<dyn Bot>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            bot,
            images_dir: images_dir.into(),
        }
    }

    /// Downloads `url` and sends it to `chat`. Never fails: every problem ends as a chat message.
    #[instrument(skip(self, chat), fields(chat_id = chat.id))]
    pub async fn deliver(&self, chat: &Chat, url: &str) -> DeliveryOutcome {
        match self.try_deliver(chat, url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, url = %url, "Image delivery failed");
                notify(
                    self.bot.as_ref(),
                    chat,
                    &format!("Failed to process image: {}", e),
                )
                .await;
                DeliveryOutcome::Failed
            }
        }
    }

    async fn try_deliver(&self, chat: &Chat, url: &str) -> Result<DeliveryOutcome, DeliveryError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url = %url, "Image download returned non-200");
            self.bot
                .send_message(chat, &format!("Failed to download image: {}", status.as_u16()))
                .await?;
            return Ok(DeliveryOutcome::DownloadFailed(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let path = save_image(&self.images_dir, &bytes, Local::now()).await?;
        self.bot.send_photo(chat, &path).await?;

        info!(path = %path.display(), size = bytes.len(), "Image saved and sent");
        Ok(DeliveryOutcome::Sent(path))
    }
}

/// `generated_image_YYYYmmdd_HHMMSS.png`, with `_<n>` before the extension for n > 0.
pub fn image_file_name(now: DateTime<Local>, n: u32) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S");
    if n == 0 {
        format!("generated_image_{}.png", stamp)
    } else {
        format!("generated_image_{}_{}.png", stamp, n)
    }
}

/// Writes `bytes` to a new file in `dir` (created if missing). Never overwrites an existing image:
/// if the timestamp name is taken, the next free numeric suffix is used.
pub async fn save_image(dir: &Path, bytes: &[u8], now: DateTime<Local>) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let mut n = 0;
    loop {
        let path = dir.join(image_file_name(now, n));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(image_file_name(fixed_time(), 0), "generated_image_20240309_070501.png");
        assert_eq!(image_file_name(fixed_time(), 2), "generated_image_20240309_070501_2.png");
    }

    #[tokio::test]
    async fn test_save_image_creates_dir_and_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("images");

        let first = save_image(&dir, b"one", fixed_time()).await.unwrap();
        let second = save_image(&dir, b"two", fixed_time()).await.unwrap();

        assert_eq!(first, dir.join("generated_image_20240309_070501.png"));
        assert_eq!(second, dir.join("generated_image_20240309_070501_1.png"));
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }
}
