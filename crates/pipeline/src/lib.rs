//! Enrichment orchestrator.
//!
//! Runs the three per-record enrichment stages (image, metadata, story)
//! against injected collaborators: a [`mondex_db::store::MonsterStore`],
//! the generative clients, and the asset materializer. Each stage is
//! strictly sequential — read, one upstream call, one persistence write —
//! with no internal retries.

pub mod enrich;
pub mod error;
pub mod prompts;

pub use enrich::{EnrichmentPipeline, MonsterProfile};
pub use error::StageError;
