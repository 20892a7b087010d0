use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mondex_core::error::CoreError;
use mondex_pipeline::StageError;
use mondex_storage::MaterializeError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors ([`CoreError`], [`StageError`]) and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error": ..., "code": ... }` JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mondex_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed enrichment stage.
    #[error(transparent)]
    Stage(#[from] StageError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Malformed upstream output carries the raw text so callers can
        // diagnose the failure without re-running the stage.
        if let AppError::Stage(StageError::MalformedUpstreamOutput { raw }) = &self {
            let body = json!({
                "error": "Failed to parse generative output",
                "code": "MALFORMED_UPSTREAM_OUTPUT",
                "raw": raw,
            });
            return (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Stage(stage) => classify_stage_error(stage),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a stage failure to an HTTP status, error code, and message.
///
/// Upstream problems (the generative service, or fetching its transient
/// output) are 502s; our own storage/persistence problems are 500s; a
/// stage run out of order is a 409.
fn classify_stage_error(err: &StageError) -> (StatusCode, &'static str, String) {
    match err {
        StageError::NotFound { id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Monster with id {id} not found"),
        ),
        StageError::NotEligible { .. } => {
            (StatusCode::CONFLICT, "STAGE_NOT_ELIGIBLE", err.to_string())
        }
        StageError::Upstream(upstream) => {
            tracing::error!(error = %upstream, "Generative service call failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                err.to_string(),
            )
        }
        StageError::UpstreamEmpty => (
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_EMPTY",
            err.to_string(),
        ),
        StageError::MalformedUpstreamOutput { .. } => (
            // Handled with its own body shape in `into_response`.
            StatusCode::BAD_GATEWAY,
            "MALFORMED_UPSTREAM_OUTPUT",
            err.to_string(),
        ),
        StageError::Materialize(MaterializeError::Download(download)) => {
            tracing::error!(error = %download, "Transient image download failed");
            (
                StatusCode::BAD_GATEWAY,
                "DOWNLOAD_ERROR",
                download.to_string(),
            )
        }
        StageError::Materialize(MaterializeError::Storage(storage)) => {
            tracing::error!(error = %storage, "Blob storage write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                storage.to_string(),
            )
        }
        StageError::Datastore(db) => {
            tracing::error!(error = %db, "Datastore read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        StageError::Persistence(db) => {
            tracing::error!(error = %db, "Datastore write failed after upstream success");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Generated content could not be saved; re-run the stage".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
