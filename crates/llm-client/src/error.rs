//! Completion failures. The `Display` text of each variant is what the user sees in the chat.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse API response as JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Unexpected API response format: {0}")]
    MissingChoices(String),

    #[error("API returned an empty response")]
    EmptyChoices,

    #[error("No message in API response choice: {0}")]
    MissingMessage(String),

    #[error("No content in API response message: {0}")]
    MissingContent(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CompletionError {
    /// Request-building failures are our fault, not the network's.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Unexpected(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}
