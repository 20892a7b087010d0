//! Image generation client.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GenAiConfig;
use crate::error::GenAiError;

/// Seam for the generative image service.
///
/// `Ok(None)` means the service answered successfully but produced no image
/// URL; the caller decides how to surface that.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Request one generated image for the prompt. Returns a transient URL.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenAiError>;
}

/// Response from the `/images/generations` endpoint.
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

impl ImageResponse {
    fn first_url(self) -> Option<String> {
        self.data.into_iter().next().and_then(|datum| datum.url)
    }
}

/// HTTP client for an OpenAI-compatible image generation endpoint.
pub struct OpenAiImageClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl OpenAiImageClient {
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
impl ImageGenerator for OpenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenAiError> {
        let body = serde_json::json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "n": 1,
            "size": self.config.image_size,
        });

        let response = self
            .client
            .post(format!("{}/images/generations", self.config.base_url))
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

        let parsed: ImageResponse = response.json().await?;
        let url = parsed.first_url();
        tracing::debug!(model = %self.config.image_model, got_url = url.is_some(), "Image generation call finished");
        Ok(url)
    }
}
