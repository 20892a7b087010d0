//! Repository for the `monsters` table.
//!
//! Every write is a single-row, single-statement update; the enrichment
//! pipeline relies on each stage touching only the columns it owns.

use mondex_core::level::LevelClassification;
use mondex_core::types::DbId;
use sqlx::PgPool;

use crate::models::monster::{CreateMonster, Monster};

/// Column list for `monsters` queries.
const MONSTER_COLUMNS: &str = "\
    id, original_image_url, ai_image_url, \
    monster_name, description, story, \
    level_input_value, level_grade, level_numeric, \
    created_at, updated_at";

/// Provides CRUD operations for monster records.
pub struct MonsterRepo;

impl MonsterRepo {
    /// Insert a freshly uploaded record. All enrichment fields start absent.
    pub async fn insert(pool: &PgPool, input: &CreateMonster) -> Result<Monster, sqlx::Error> {
        let query = format!(
            "INSERT INTO monsters (original_image_url) VALUES ($1) \
             RETURNING {MONSTER_COLUMNS}"
        );
        sqlx::query_as::<_, Monster>(&query)
            .bind(&input.original_image_url)
            .fetch_one(pool)
            .await
    }

    /// Insert a pre-made record from the import path: both image URLs plus
    /// the classified level triple, in one row.
    pub async fn insert_imported(
        pool: &PgPool,
        original_image_url: &str,
        ai_image_url: &str,
        level: &LevelClassification,
    ) -> Result<Monster, sqlx::Error> {
        let query = format!(
            "INSERT INTO monsters (\
                original_image_url, ai_image_url, \
                level_input_value, level_grade, level_numeric\
             ) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {MONSTER_COLUMNS}"
        );
        sqlx::query_as::<_, Monster>(&query)
            .bind(original_image_url)
            .bind(ai_image_url)
            .bind(&level.input)
            .bind(&level.grade)
            .bind(level.numeric)
            .fetch_one(pool)
            .await
    }

    /// Find a monster by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Monster>, sqlx::Error> {
        let query = format!("SELECT {MONSTER_COLUMNS} FROM monsters WHERE id = $1");
        sqlx::query_as::<_, Monster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all monsters, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Monster>, sqlx::Error> {
        let query = format!("SELECT {MONSTER_COLUMNS} FROM monsters ORDER BY created_at DESC");
        sqlx::query_as::<_, Monster>(&query).fetch_all(pool).await
    }

    /// Persist the durable illustration URL produced by the image stage.
    pub async fn set_ai_image_url(pool: &PgPool, id: DbId, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE monsters SET ai_image_url = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(url)
            .execute(pool)
            .await
            .map(|_| ())
    }

    /// Persist the generated name and description together.
    pub async fn set_profile(
        pool: &PgPool,
        id: DbId,
        name: &str,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE monsters SET monster_name = $2, description = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await
        .map(|_| ())
    }

    /// Persist (or overwrite) the generated story.
    pub async fn set_story(pool: &PgPool, id: DbId, story: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE monsters SET story = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(story)
            .execute(pool)
            .await
            .map(|_| ())
    }

    /// Apply a user edit: name, description, and the classified level triple.
    ///
    /// The profile values must already be merged with the stored row
    /// (`UpdateMonsterInfo::merged_profile`); this write is unconditional.
    /// Returns the updated row, or `None` when the record does not exist.
    pub async fn update_info(
        pool: &PgPool,
        id: DbId,
        monster_name: Option<&str>,
        description: Option<&str>,
        level: &LevelClassification,
    ) -> Result<Option<Monster>, sqlx::Error> {
        let query = format!(
            "UPDATE monsters SET \
                monster_name = $2, description = $3, \
                level_input_value = $4, level_grade = $5, level_numeric = $6, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {MONSTER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Monster>(&query)
            .bind(id)
            .bind(monster_name)
            .bind(description)
            .bind(&level.input)
            .bind(&level.grade)
            .bind(level.numeric)
            .fetch_optional(pool)
            .await?;

        if updated.is_some() {
            tracing::debug!(monster_id = id, grade = %level.grade, "Updated monster info");
        }
        Ok(updated)
    }
}
