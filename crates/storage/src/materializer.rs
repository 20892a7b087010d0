//! Asset materializer: transient URL in, durable URL out.

use std::sync::Arc;

use crate::fetch::{DownloadError, ImageFetcher};
use crate::{blob_path, BlobStore, StorageError, IMAGE_CONTENT_TYPE};

/// Materialization failure. The two variants let callers distinguish a
/// failed download from a failed persist.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Downloads a transient generated image and persists it to blob storage.
///
/// No retry happens here; a failed materialization is reported upward and
/// the caller re-runs the whole enrichment stage. Each run generates a
/// fresh blob key, so a retry after a successful upload but failed
/// downstream write leaves an orphaned blob behind — an accepted cost.
pub struct AssetMaterializer {
    fetcher: Arc<dyn ImageFetcher>,
    store: Arc<dyn BlobStore>,
    prefix: String,
}

impl AssetMaterializer {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        store: Arc<dyn BlobStore>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            prefix: prefix.into(),
        }
    }

    /// Fetch the bytes behind `transient_url`, store them durably, and
    /// return the stable public URL.
    pub async fn materialize(&self, transient_url: &str) -> Result<String, MaterializeError> {
        let bytes = self.fetcher.fetch(transient_url).await?;

        let path = blob_path(&self.prefix);
        self.store.put(&path, &bytes, IMAGE_CONTENT_TYPE).await?;

        let url = self.store.public_url(&path);
        tracing::info!(transient_url, durable_url = %url, "Materialized transient image");
        Ok(url)
    }
}
