//! Durable blob storage and the asset materializer.
//!
//! [`BlobStore`] abstracts over the storage provider (S3 in production,
//! in-memory fakes in tests). [`materializer::AssetMaterializer`] turns a
//! transient generated-image URL into a durable public URL by downloading
//! the bytes and persisting them under a collision-resistant key.

pub mod fetch;
pub mod materializer;
pub mod s3;

pub use fetch::{DownloadError, HttpImageFetcher, ImageFetcher};
pub use materializer::{AssetMaterializer, MaterializeError};
pub use s3::{S3BlobStore, S3Config};

use async_trait::async_trait;

/// Content type for every image blob this system writes.
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Errors from a blob storage provider.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The provider rejected or failed the write.
    #[error("Blob store error: {0}")]
    Backend(String),
}

/// Storage provider seam.
///
/// `public_url` is a pure computation over configuration; only `put`
/// touches the network.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write bytes under `path` with an explicit content type.
    async fn put(&self, path: &str, bytes: &[u8], content_type: &str)
        -> Result<(), StorageError>;

    /// Permanently resolvable URL for a stored path.
    fn public_url(&self, path: &str) -> String;
}

/// Collision-resistant blob key: `{prefix}/{unix_millis}-{uuid}.png`.
///
/// A fresh key is generated per call, so re-running a failed stage writes a
/// new blob rather than reusing the old path.
pub fn blob_path(prefix: &str) -> String {
    format!(
        "{}/{}-{}.png",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4()
    )
}
