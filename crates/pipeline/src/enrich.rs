//! The three enrichment stages.

use std::sync::Arc;

use mondex_core::stage::Stage;
use mondex_core::types::DbId;
use mondex_db::models::monster::Monster;
use mondex_db::store::MonsterStore;
use mondex_genai::{ImageGenerator, TextGenerator};
use mondex_storage::AssetMaterializer;
use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::prompts;

/// The structured payload the metadata stage requests from the text model.
///
/// All three keys are required strings; a missing or mis-typed key fails
/// the parse, while extra keys in the model's output are ignored.
/// `traits` is returned to the caller but deliberately not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterProfile {
    pub monster_name: String,
    pub description: String,
    pub traits: String,
}

/// Orchestrates the enrichment stages over injected collaborators.
///
/// Holds no per-record state and imposes no locking; callers must not run
/// the same stage concurrently for the same record id.
pub struct EnrichmentPipeline {
    store: Arc<dyn MonsterStore>,
    image: Arc<dyn ImageGenerator>,
    text: Arc<dyn TextGenerator>,
    materializer: AssetMaterializer,
}

impl EnrichmentPipeline {
    pub fn new(
        store: Arc<dyn MonsterStore>,
        image: Arc<dyn ImageGenerator>,
        text: Arc<dyn TextGenerator>,
        materializer: AssetMaterializer,
    ) -> Self {
        Self {
            store,
            image,
            text,
            materializer,
        }
    }

    /// Load a record and check that `stage` may run from its current state.
    async fn load_eligible(&self, id: DbId, stage: Stage) -> Result<Monster, StageError> {
        let monster = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(StageError::NotFound { id })?;

        let state = monster.enrichment_state();
        if !stage.eligible(state) {
            return Err(StageError::NotEligible { stage, state });
        }

        Ok(monster)
    }

    /// Image stage: generate an illustration, materialize it, persist the
    /// durable URL. Returns the durable URL.
    ///
    /// The record never stores the transient URL the image service returns;
    /// any failure before the final write leaves `ai_image_url` absent.
    pub async fn run_image_stage(&self, id: DbId) -> Result<String, StageError> {
        let monster = self.load_eligible(id, Stage::Image).await?;

        let prompt = prompts::image_prompt(&monster.original_image_url);
        let transient_url = self
            .image
            .generate_image(&prompt)
            .await?
            .ok_or(StageError::UpstreamEmpty)?;

        let durable_url = self.materializer.materialize(&transient_url).await?;

        self.store
            .set_ai_image_url(id, &durable_url)
            .await
            .map_err(StageError::Persistence)?;

        tracing::info!(monster_id = id, ai_image_url = %durable_url, "Image stage complete");
        Ok(durable_url)
    }

    /// Metadata stage: generate name/description/traits as strict JSON and
    /// persist name + description together.
    ///
    /// Re-running overwrites the previous profile. The returned
    /// [`MonsterProfile`] includes `traits`, which is not persisted.
    pub async fn run_metadata_stage(&self, id: DbId) -> Result<MonsterProfile, StageError> {
        let monster = self.load_eligible(id, Stage::Metadata).await?;

        // Eligibility guarantees the illustration exists.
        let ai_image_url = monster.ai_image_url.as_deref().unwrap_or_default();
        let prompt = prompts::profile_prompt(&monster.original_image_url, ai_image_url);

        let text = self.text.complete(&prompt).await?;

        // Fail closed: no guessing, no repair of almost-JSON.
        let profile: MonsterProfile = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(monster_id = id, error = %e, "Metadata output failed to parse");
            StageError::MalformedUpstreamOutput { raw: text.clone() }
        })?;

        self.store
            .set_profile(id, &profile.monster_name, &profile.description)
            .await
            .map_err(StageError::Persistence)?;

        tracing::info!(monster_id = id, monster_name = %profile.monster_name, "Metadata stage complete");
        Ok(profile)
    }

    /// Story stage: generate a story starring `child_name` and persist it.
    ///
    /// Re-running with a different protagonist overwrites the story; the
    /// profile fields are untouched. The returned prose is validated only
    /// for non-emptiness.
    pub async fn run_story_stage(&self, id: DbId, child_name: &str) -> Result<String, StageError> {
        let monster = self.load_eligible(id, Stage::Story).await?;

        // Eligibility guarantees both profile fields exist.
        let monster_name = monster.monster_name.as_deref().unwrap_or_default();
        let description = monster.description.as_deref().unwrap_or_default();
        let prompt = prompts::story_prompt(child_name, monster_name, description);

        let story = self.text.complete(&prompt).await?;
        if story.trim().is_empty() {
            return Err(StageError::UpstreamEmpty);
        }

        self.store
            .set_story(id, &story)
            .await
            .map_err(StageError::Persistence)?;

        tracing::info!(monster_id = id, chars = story.len(), "Story stage complete");
        Ok(story)
    }
}
