//! S3 blob storage provider.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;

use crate::{BlobStore, StorageError};

/// S3 configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket all image blobs are written to.
    pub bucket: String,
    /// Base URL public object URLs are built from (no trailing slash),
    /// e.g. a CDN or the bucket's website endpoint.
    pub public_base_url: String,
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default    |
    /// |------------------------|------------|
    /// | `BLOB_BUCKET`          | (required) |
    /// | `BLOB_PUBLIC_BASE_URL` | (required) |
    ///
    /// AWS credentials and region come from the standard SDK chain.
    pub fn from_env() -> Self {
        let bucket = std::env::var("BLOB_BUCKET").expect("BLOB_BUCKET must be set");

        let public_base_url = std::env::var("BLOB_PUBLIC_BASE_URL")
            .expect("BLOB_PUBLIC_BASE_URL must be set")
            .trim_end_matches('/')
            .to_string();

        Self {
            bucket,
            public_base_url,
        }
    }
}

/// [`BlobStore`] backed by an S3 bucket.
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3BlobStore {
    /// Build a store from the standard AWS configuration chain.
    pub async fn from_env(config: S3Config) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            config,
        }
    }

    pub fn new(client: aws_sdk_s3::Client, config: S3Config) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(path)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(path, size = bytes.len(), "Stored blob in S3");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.public_base_url, path)
    }
}
