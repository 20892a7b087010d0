use mondex_core::stage::{EnrichmentState, Stage};
use mondex_core::types::DbId;
use mondex_genai::GenAiError;
use mondex_storage::MaterializeError;

/// Structured outcome of a failed enrichment stage.
///
/// Every variant is terminal for the current invocation: nothing here is
/// retried automatically, and (except for the orphaned-blob cost noted on
/// [`Persistence`](Self::Persistence)) a failed stage leaves the record
/// exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The record id does not resolve to a monster.
    #[error("Monster not found: {id}")]
    NotFound { id: DbId },

    /// The record's lifecycle state does not allow this stage yet
    /// (or, for the image stage, allows it no longer).
    #[error("Stage '{stage}' is not eligible for a record in state '{state}'")]
    NotEligible {
        stage: Stage,
        state: EnrichmentState,
    },

    /// Reading the record from the datastore failed before any upstream call.
    #[error("Datastore error: {0}")]
    Datastore(#[from] sqlx::Error),

    /// The generative service call itself failed.
    #[error(transparent)]
    Upstream(#[from] GenAiError),

    /// The generative service answered but produced no usable payload.
    #[error("Generative service returned no usable payload")]
    UpstreamEmpty,

    /// Text that was required to be JSON did not parse. Carries the raw
    /// text so the failure can be diagnosed without re-running the stage.
    #[error("Generative output is not valid JSON: {raw}")]
    MalformedUpstreamOutput { raw: String },

    /// Downloading or durably storing the generated image failed.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    /// The datastore write failed after the upstream call succeeded. For
    /// the image stage the blob is already durable; re-running the stage
    /// generates a fresh blob key, orphaning the old one.
    #[error("Datastore write failed after upstream success: {0}")]
    Persistence(#[source] sqlx::Error),
}
