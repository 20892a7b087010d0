//! Chat completion client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GenAiConfig;
use crate::error::GenAiError;

/// Seam for the generative text service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion for the prompt and return the raw text.
    ///
    /// The text is returned verbatim — no trimming, no repair. An answer
    /// with no content field comes back as an empty string.
    async fn complete(&self, prompt: &str) -> Result<String, GenAiError>;
}

/// Response from the `/chat/completions` endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

/// HTTP client for an OpenAI-compatible chat completion endpoint.
pub struct OpenAiChatClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl OpenAiChatClient {
    pub fn new(config: GenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, config: GenAiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = serde_json::json!({
            "model": self.config.chat_model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed.first_content();
        tracing::debug!(model = %self.config.chat_model, chars = content.len(), "Chat completion call finished");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_extracted_from_first_choice() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_content(), "hello");
    }

    #[test]
    fn missing_content_becomes_empty_string() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert_eq!(parsed.first_content(), "");

        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(parsed.first_content(), "");
    }
}
