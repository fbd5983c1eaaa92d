//! HTTP side of the generator: submit the prompt, then hand the body stream to [`read_status_stream`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::stream::read_status_stream;
use crate::{ImageGenerationError, ImageGenerator};

pub const DEFAULT_ENDPOINT: &str = "https://neuroimg.art/api/v1/free-generate";
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(300);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    token: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// neuroimg `free-generate` client.
#[derive(Clone)]
pub struct NeuroImgClient {
    http: reqwest::Client,
    token: String,
    endpoint: String,
    deadline: Duration,
}

impl NeuroImgClient {
    pub fn new(http: reqwest::Client, token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            endpoint: endpoint.into(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Upper bound for the whole request, including time spent queued.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Generates an image and returns its URL.
    ///
    /// # Returns
    /// `Ok(Some(url))` on `SUCCESS`; `Ok(None)` if the stream closed without one, the service
    /// reported a failure, or the deadline passed.
    #[instrument(skip(self, description))]
    pub async fn generate_image(
        &self,
        description: &str,
    ) -> Result<Option<String>, ImageGenerationError> {
        info!(
            endpoint = %self.endpoint,
            prompt_preview = %description.chars().take(100).collect::<String>(),
            deadline_secs = self.deadline.as_secs(),
            "Image generation request"
        );

        match tokio::time::timeout(self.deadline, self.poll(description)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    deadline_secs = self.deadline.as_secs(),
                    "Image generation deadline exceeded"
                );
                Ok(None)
            }
        }
    }

    async fn poll(&self, description: &str) -> Result<Option<String>, ImageGenerationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GenerateRequest {
                token: &self.token,
                prompt: description,
                stream: true,
            })
            .send()
            .await
            .map_err(ImageGenerationError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        read_status_stream(response.bytes_stream())
            .await
            .map_err(ImageGenerationError::Stream)
    }
}

#[async_trait]
impl ImageGenerator for NeuroImgClient {
    async fn generate(&self, description: &str) -> Result<Option<String>, ImageGenerationError> {
        self.generate_image(description).await
    }
}
