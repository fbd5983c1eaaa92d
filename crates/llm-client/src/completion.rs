//! Chat-completion client over plain reqwest. The response is walked as untyped JSON so each
//! missing level (choices, message, content) gets its own error instead of a generic decode failure.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{mask_token, CompletionError, LlmClient};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "qwen/qwq-32b:free";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Single-turn chat completion client. Timeouts come from the injected `reqwest::Client`.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl CompletionClient {
    /// `base_url` is the API root, e.g. `https://openrouter.ai/api/v1`; `/chat/completions` is appended.
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user message and returns the first choice's content.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        info!(
            endpoint = %self.endpoint,
            api_key = %mask_token(&self.api_key),
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            "Chat completion request"
        );

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| CompletionError::Unexpected(e.to_string()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, auth)
            .json(&request)
            .send()
            .await
            .map_err(CompletionError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(CompletionError::from_reqwest)?;

        if status != StatusCode::OK {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(CompletionError::Parse)?;
        let content = extract_content(&value)?;

        info!(reply_len = content.len(), "Chat completion finished");
        Ok(content)
    }
}

/// Walks `{choices: [{message: {content}}]}` without indexing into absent fields.
pub fn extract_content(value: &Value) -> Result<String, CompletionError> {
    let choices = value
        .get("choices")
        .ok_or_else(|| CompletionError::MissingChoices(value.to_string()))?;

    let first = match choices {
        Value::Null => return Err(CompletionError::EmptyChoices),
        Value::Array(items) => items.first().ok_or(CompletionError::EmptyChoices)?,
        _ => return Err(CompletionError::MissingChoices(value.to_string())),
    };

    let message = first
        .get("message")
        .ok_or_else(|| CompletionError::MissingMessage(first.to_string()))?;

    message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CompletionError::MissingContent(message.to_string()))
}

#[async_trait]
impl LlmClient for CompletionClient {
    async fn ask(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Chat completion failed");
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = CompletionClient::new(reqwest::Client::new(), "k", "https://example.com/api/v1/");
        assert_eq!(client.endpoint(), "https://example.com/api/v1/chat/completions");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_extract_content_ok() {
        let value = json!({"choices": [{"message": {"role": "assistant", "content": "hello"}}]});
        assert_eq!(extract_content(&value).unwrap(), "hello");
    }

    #[test]
    fn test_extract_content_missing_choices_embeds_body() {
        let value = json!({"error": {"message": "rate limited"}});
        let err = extract_content(&value).unwrap_err();
        assert!(matches!(err, CompletionError::MissingChoices(_)));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let err = extract_content(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyChoices));
        let err = extract_content(&json!({"choices": null})).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyChoices));
    }

    #[test]
    fn test_extract_content_missing_message() {
        let err = extract_content(&json!({"choices": [{"index": 0}]})).unwrap_err();
        assert!(matches!(err, CompletionError::MissingMessage(_)));
        assert!(err.to_string().contains("\"index\":0"));
    }

    #[test]
    fn test_extract_content_missing_or_null_content() {
        let err = extract_content(&json!({"choices": [{"message": {"role": "assistant"}}]}))
            .unwrap_err();
        assert!(matches!(err, CompletionError::MissingContent(_)));
        assert!(err.to_string().contains("assistant"));

        let err = extract_content(&json!({"choices": [{"message": {"content": null}}]}))
            .unwrap_err();
        assert!(matches!(err, CompletionError::MissingContent(_)));
    }

    #[test]
    fn test_extract_content_choices_not_array() {
        let err = extract_content(&json!({"choices": "nope"})).unwrap_err();
        assert!(matches!(err, CompletionError::MissingChoices(_)));
    }
}
