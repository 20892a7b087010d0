use std::sync::Arc;

use mondex_pipeline::EnrichmentPipeline;
use mondex_storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mondex_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage, used directly by the upload handler.
    pub blob_store: Arc<dyn BlobStore>,
    /// The enrichment orchestrator.
    pub pipeline: Arc<EnrichmentPipeline>,
}
