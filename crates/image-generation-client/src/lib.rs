//! neuroimg image generation client
//!
//! Submits a prompt to the `free-generate` endpoint with `stream: true` and follows the
//! newline-delimited status records until the image URL arrives.

use async_trait::async_trait;

mod client;
mod error;
mod event;
mod stream;

pub use client::{NeuroImgClient, DEFAULT_DEADLINE, DEFAULT_ENDPOINT};
pub use error::ImageGenerationError;
pub use event::GenerationEvent;
pub use stream::{read_status_stream, LineBuffer, MAX_LINE_BYTES};

/// Anything that turns a description into an image URL.
///
/// `Ok(None)` means the service finished without producing an image (stream closed, explicit
/// failure, or deadline); `Err` means the request itself could not be made or was cut off.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, description: &str) -> Result<Option<String>, ImageGenerationError>;
}
