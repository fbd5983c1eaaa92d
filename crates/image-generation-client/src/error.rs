use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageGenerationError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("image service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),
}
