//! Route definitions for the monster catalog.
//!
//! Routes mounted at `/monsters`:
//!
//! ```text
//! POST   /                       upload (multipart)
//! POST   /import                 import (multipart, both images + level)
//! GET    /                       list
//! GET    /{id}                   get_by_id
//! POST   /{id}/generate-image    image stage
//! POST   /{id}/generate-info     metadata stage
//! POST   /{id}/generate-story    story stage
//! PUT    /{id}/info              update_info
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::monster;
use crate::state::AppState;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(monster::upload)
                .get(monster::list)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/import",
            post(monster::import).layer(DefaultBodyLimit::max(max_upload_bytes * 2)),
        )
        .route("/{id}", get(monster::get_by_id))
        .route("/{id}/generate-image", post(monster::generate_image))
        .route("/{id}/generate-info", post(monster::generate_info))
        .route("/{id}/generate-story", post(monster::generate_story))
        .route("/{id}/info", put(monster::update_info))
}
