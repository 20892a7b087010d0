//! Datastore seam for the enrichment pipeline.
//!
//! The pipeline only ever needs a handful of single-row operations, so it
//! is written against this object-safe trait rather than `PgPool` directly.
//! Production uses [`PgMonsterStore`]; tests drive the pipeline with
//! in-memory fakes.

use async_trait::async_trait;
use mondex_core::types::DbId;

use crate::models::monster::Monster;
use crate::repositories::MonsterRepo;
use crate::DbPool;

/// The subset of monster persistence the enrichment stages depend on.
#[async_trait]
pub trait MonsterStore: Send + Sync {
    /// Fetch a single record by ID.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Monster>, sqlx::Error>;

    /// Write the durable AI illustration URL (image stage).
    async fn set_ai_image_url(&self, id: DbId, url: &str) -> Result<(), sqlx::Error>;

    /// Write name and description together (metadata stage).
    async fn set_profile(&self, id: DbId, name: &str, description: &str)
        -> Result<(), sqlx::Error>;

    /// Write (or overwrite) the story (story stage).
    async fn set_story(&self, id: DbId, story: &str) -> Result<(), sqlx::Error>;
}

/// Postgres-backed [`MonsterStore`] delegating to [`MonsterRepo`].
pub struct PgMonsterStore {
    pool: DbPool,
}

impl PgMonsterStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonsterStore for PgMonsterStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Monster>, sqlx::Error> {
        MonsterRepo::find_by_id(&self.pool, id).await
    }

    async fn set_ai_image_url(&self, id: DbId, url: &str) -> Result<(), sqlx::Error> {
        MonsterRepo::set_ai_image_url(&self.pool, id, url).await
    }

    async fn set_profile(
        &self,
        id: DbId,
        name: &str,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        MonsterRepo::set_profile(&self.pool, id, name, description).await
    }

    async fn set_story(&self, id: DbId, story: &str) -> Result<(), sqlx::Error> {
        MonsterRepo::set_story(&self.pool, id, story).await
    }
}
