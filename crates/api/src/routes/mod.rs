//! Route definitions.

pub mod health;
pub mod monster;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().nest("/monsters", monster::router(max_upload_bytes))
}
