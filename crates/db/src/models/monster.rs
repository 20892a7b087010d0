//! Monster entity model and DTOs.

use mondex_core::error::CoreError;
use mondex_core::stage::EnrichmentState;
use mondex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `monsters` table.
///
/// A record is born with only `original_image_url` set; each enrichment
/// stage owns and writes exactly its own fields:
///
/// - image stage    → `ai_image_url` (set at most once)
/// - metadata stage → `monster_name` + `description` (always together)
/// - story stage    → `story` (overwritten on re-run)
/// - info edit      → `level_input_value` + `level_grade` + `level_numeric`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Monster {
    pub id: DbId,
    pub original_image_url: String,
    pub ai_image_url: Option<String>,
    pub monster_name: Option<String>,
    pub description: Option<String>,
    pub story: Option<String>,
    pub level_input_value: Option<String>,
    pub level_grade: Option<String>,
    pub level_numeric: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Monster {
    /// Derive the record's position in the enrichment pipeline from which
    /// optional fields are populated.
    pub fn enrichment_state(&self) -> EnrichmentState {
        EnrichmentState::from_flags(
            self.ai_image_url.is_some(),
            self.monster_name.is_some() && self.description.is_some(),
            self.story.is_some(),
        )
    }
}

/// DTO for creating a new monster record from an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMonster {
    pub original_image_url: String,
}

/// DTO for the info-edit path (name, description, raw level text).
///
/// All fields are optional: an omitted field leaves the stored value
/// untouched. The raw level text is classified before persisting; the
/// resulting grade triple is written alongside the name and description.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMonsterInfo {
    pub monster_name: Option<String>,
    pub description: Option<String>,
    pub level_input_value: Option<String>,
}

impl UpdateMonsterInfo {
    /// Merge this edit onto the record's current profile fields.
    ///
    /// Fields omitted from the edit keep their stored values, so a
    /// level-only edit never clears a generated profile. The schema's
    /// pair rule still applies to the merged result: an edit that would
    /// leave exactly one of name/description set is rejected.
    pub fn merged_profile(
        &self,
        current: &Monster,
    ) -> Result<(Option<String>, Option<String>), CoreError> {
        let monster_name = self
            .monster_name
            .clone()
            .or_else(|| current.monster_name.clone());
        let description = self
            .description
            .clone()
            .or_else(|| current.description.clone());

        if monster_name.is_some() != description.is_some() {
            return Err(CoreError::Validation(
                "monster_name and description must be set together".into(),
            ));
        }

        Ok((monster_name, description))
    }
}
