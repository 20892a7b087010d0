//! HTTP fetch seam for downloading transient generated images.

use async_trait::async_trait;

/// A transient image could not be downloaded.
#[derive(Debug, thiserror::Error)]
#[error("Failed to download {url}: {reason}")]
pub struct DownloadError {
    pub url: String,
    pub reason: String,
}

/// Seam for fetching raw bytes from a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// reqwest-backed fetcher. Non-2xx statuses are download failures.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError {
                url: url.to_string(),
                reason: format!("unexpected status {status}"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| DownloadError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}
