//! Handlers for the monster catalog and its enrichment stages.
//!
//! Routes (mounted at `/monsters`):
//! - `POST /`                     — multipart upload, creates a record
//! - `POST /import`               — multipart import (both images + level)
//! - `GET  /`                     — list, newest first
//! - `GET  /{id}`                 — single record
//! - `POST /{id}/generate-image`  — image stage
//! - `POST /{id}/generate-info`   — metadata stage
//! - `POST /{id}/generate-story`  — story stage (protagonist in body)
//! - `PUT  /{id}/info`            — edit name/description/level

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use mondex_core::error::CoreError;
use mondex_core::level;
use mondex_core::types::DbId;
use mondex_db::models::monster::{CreateMonster, Monster, UpdateMonsterInfo};
use mondex_db::repositories::MonsterRepo;
use mondex_pipeline::MonsterProfile;
use mondex_storage::{blob_path, IMAGE_CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub monster_id: DbId,
    pub original_image_url: String,
}

/// POST /api/v1/monsters
///
/// Accepts a multipart form with a required `file` field containing the
/// child's drawing. The bytes are stored durably first; the record is
/// inserted only after the blob write succeeds.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResponse>>)> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or(IMAGE_CONTENT_TYPE)
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((data.to_vec(), content_type));
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("File not found (file key)".into()))?;
    if file.0.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let original_image_url = store_image(&state, "uploads", &file).await?;

    let monster = MonsterRepo::insert(
        &state.pool,
        &CreateMonster {
            original_image_url: original_image_url.clone(),
        },
    )
    .await?;

    tracing::info!(monster_id = monster.id, "Uploaded new monster drawing");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResponse {
                monster_id: monster.id,
                original_image_url,
            },
        }),
    ))
}

/// POST /api/v1/monsters/import
///
/// Bulk-entry path for records that already have both images: a multipart
/// form with `original` and `ai` file fields plus a required `level` text
/// field. The level is classified by the same engine as the edit path.
pub async fn import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Monster>>)> {
    let mut original: Option<(Vec<u8>, String)> = None;
    let mut ai: Option<(Vec<u8>, String)> = None;
    let mut level_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "original" | "ai" => {
                let content_type = field
                    .content_type()
                    .unwrap_or(IMAGE_CONTENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if name == "original" {
                    original = Some((data.to_vec(), content_type));
                } else {
                    ai = Some((data.to_vec(), content_type));
                }
            }
            "level" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                level_text = Some(text);
            }
            _ => {}
        }
    }

    let original = original.ok_or_else(|| {
        AppError::BadRequest("Both 'original' and 'ai' files are required".into())
    })?;
    let ai = ai.ok_or_else(|| {
        AppError::BadRequest("Both 'original' and 'ai' files are required".into())
    })?;
    let level_text =
        level_text.ok_or_else(|| AppError::BadRequest("'level' field is required".into()))?;

    let classification = level::classify(&level_text);

    let original_url = store_image(&state, "uploads", &original).await?;
    let ai_url = store_image(&state, "ai-images", &ai).await?;

    let monster =
        MonsterRepo::insert_imported(&state.pool, &original_url, &ai_url, &classification).await?;

    tracing::info!(monster_id = monster.id, grade = %classification.grade, "Imported monster");

    Ok((StatusCode::CREATED, Json(DataResponse { data: monster })))
}

/// Store one uploaded image and return its public URL.
async fn store_image(
    state: &AppState,
    prefix: &str,
    (data, content_type): &(Vec<u8>, String),
) -> AppResult<String> {
    let path = blob_path(prefix);
    state
        .blob_store
        .put(&path, data, content_type)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(state.blob_store.public_url(&path))
}

/// GET /api/v1/monsters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Monster>>>> {
    let monsters = MonsterRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: monsters }))
}

/// GET /api/v1/monsters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Monster>>> {
    let monster = MonsterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))?;
    Ok(Json(DataResponse { data: monster }))
}

/// Response payload for the image stage.
#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub ai_image_url: String,
}

/// POST /api/v1/monsters/{id}/generate-image
pub async fn generate_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GenerateImageResponse>>> {
    let ai_image_url = state.pipeline.run_image_stage(id).await?;
    Ok(Json(DataResponse {
        data: GenerateImageResponse { ai_image_url },
    }))
}

/// POST /api/v1/monsters/{id}/generate-info
///
/// The response includes `traits`, which is returned to the caller but
/// not persisted on the record.
pub async fn generate_info(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MonsterProfile>>> {
    let profile = state.pipeline.run_metadata_stage(id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// Request body for the story stage.
#[derive(Debug, Deserialize)]
pub struct GenerateStoryRequest {
    pub child_name: String,
}

/// Response payload for the story stage.
#[derive(Debug, Serialize)]
pub struct GenerateStoryResponse {
    pub story: String,
}

/// POST /api/v1/monsters/{id}/generate-story
pub async fn generate_story(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GenerateStoryRequest>,
) -> AppResult<Json<DataResponse<GenerateStoryResponse>>> {
    if input.child_name.trim().is_empty() {
        return Err(AppError::BadRequest("child_name must not be empty".into()));
    }

    let story = state.pipeline.run_story_stage(id, &input.child_name).await?;
    Ok(Json(DataResponse {
        data: GenerateStoryResponse { story },
    }))
}

/// PUT /api/v1/monsters/{id}/info
///
/// Edits name/description and re-classifies the level from the raw text.
/// Omitted fields keep their stored values, so a level-only edit never
/// clears a generated profile. The classification engine is the single
/// source of grades for both this path and record creation.
pub async fn update_info(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMonsterInfo>,
) -> AppResult<Json<DataResponse<Monster>>> {
    let current = MonsterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Monster",
            id,
        }))?;

    let (monster_name, description) = input.merged_profile(&current)?;

    let classification = level::classify(
        input
            .level_input_value
            .as_deref()
            .or(current.level_input_value.as_deref())
            .unwrap_or(""),
    );

    let monster = MonsterRepo::update_info(
        &state.pool,
        id,
        monster_name.as_deref(),
        description.as_deref(),
        &classification,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Monster",
        id,
    }))?;

    Ok(Json(DataResponse { data: monster }))
}
