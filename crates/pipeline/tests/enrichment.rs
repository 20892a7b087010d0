//! Enrichment stage tests over in-memory fakes.
//!
//! Every external collaborator (datastore, image/text services, blob
//! store, image download) is replaced by a test double, so these tests
//! exercise the orchestrator's ordering, failure handling, and
//! no-partial-write guarantees without any network or database.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use mondex_core::types::DbId;
use mondex_db::models::monster::Monster;
use mondex_db::store::MonsterStore;
use mondex_genai::{GenAiError, ImageGenerator, TextGenerator};
use mondex_pipeline::{EnrichmentPipeline, StageError};
use mondex_storage::{
    AssetMaterializer, BlobStore, DownloadError, ImageFetcher, MaterializeError, StorageError,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

fn monster(id: DbId) -> Monster {
    let now = chrono::Utc::now();
    Monster {
        id,
        original_image_url: format!("https://blobs.test/uploads/{id}.png"),
        ai_image_url: None,
        monster_name: None,
        description: None,
        story: None,
        level_input_value: None,
        level_grade: None,
        level_numeric: None,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory [`MonsterStore`] with an optional write-failure switch.
#[derive(Default)]
struct FakeStore {
    monsters: Mutex<HashMap<DbId, Monster>>,
    fail_writes: bool,
}

impl FakeStore {
    fn with(records: Vec<Monster>) -> Arc<Self> {
        Arc::new(Self {
            monsters: Mutex::new(records.into_iter().map(|m| (m.id, m)).collect()),
            fail_writes: false,
        })
    }

    fn failing_writes(records: Vec<Monster>) -> Arc<Self> {
        Arc::new(Self {
            monsters: Mutex::new(records.into_iter().map(|m| (m.id, m)).collect()),
            fail_writes: true,
        })
    }

    fn get(&self, id: DbId) -> Monster {
        self.monsters.lock().unwrap().get(&id).unwrap().clone()
    }
}

#[async_trait]
impl MonsterStore for FakeStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Monster>, sqlx::Error> {
        Ok(self.monsters.lock().unwrap().get(&id).cloned())
    }

    async fn set_ai_image_url(&self, id: DbId, url: &str) -> Result<(), sqlx::Error> {
        if self.fail_writes {
            return Err(sqlx::Error::PoolClosed);
        }
        if let Some(m) = self.monsters.lock().unwrap().get_mut(&id) {
            m.ai_image_url = Some(url.to_string());
        }
        Ok(())
    }

    async fn set_profile(
        &self,
        id: DbId,
        name: &str,
        description: &str,
    ) -> Result<(), sqlx::Error> {
        if self.fail_writes {
            return Err(sqlx::Error::PoolClosed);
        }
        if let Some(m) = self.monsters.lock().unwrap().get_mut(&id) {
            m.monster_name = Some(name.to_string());
            m.description = Some(description.to_string());
        }
        Ok(())
    }

    async fn set_story(&self, id: DbId, story: &str) -> Result<(), sqlx::Error> {
        if self.fail_writes {
            return Err(sqlx::Error::PoolClosed);
        }
        if let Some(m) = self.monsters.lock().unwrap().get_mut(&id) {
            m.story = Some(story.to_string());
        }
        Ok(())
    }
}

/// Image service double answering with a fixed transient URL (or none).
struct FixedImage(Option<String>);

#[async_trait]
impl ImageGenerator for FixedImage {
    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, GenAiError> {
        Ok(self.0.clone())
    }
}

/// Text service double answering from a queue, one response per call.
struct ScriptedText {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedText {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
        })
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn complete(&self, _prompt: &str) -> Result<String, GenAiError> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedText ran out of responses"))
    }
}

/// Fetcher double returning fixed bytes for any URL.
struct FixedFetcher;

#[async_trait]
impl ImageFetcher for FixedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, DownloadError> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }
}

/// Blob store double recording puts; optionally rejects them.
#[derive(Default)]
struct MemoryBlobStore {
    puts: Mutex<Vec<String>>,
    reject: bool,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, _bytes: &[u8], _ct: &str) -> Result<(), StorageError> {
        if self.reject {
            return Err(StorageError::Backend("bucket is full".into()));
        }
        self.puts.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://blobs.test/{path}")
    }
}

struct Harness {
    store: Arc<FakeStore>,
    blobs: Arc<MemoryBlobStore>,
    pipeline: EnrichmentPipeline,
}

fn harness(
    store: Arc<FakeStore>,
    image: Arc<dyn ImageGenerator>,
    text: Arc<dyn TextGenerator>,
) -> Harness {
    let blobs = Arc::new(MemoryBlobStore::default());
    let materializer =
        AssetMaterializer::new(Arc::new(FixedFetcher), blobs.clone(), "ai-images");
    let pipeline = EnrichmentPipeline::new(store.clone(), image, text, materializer);
    Harness {
        store,
        blobs,
        pipeline,
    }
}

fn no_text() -> Arc<dyn TextGenerator> {
    ScriptedText::new(&[])
}

const PROFILE_JSON: &str = r#"{
    "monster_name": "Bobo",
    "description": "A round purple friend who loves berries.",
    "traits": "Brave and a little clumsy."
}"#;

// ---------------------------------------------------------------------------
// Image stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_stage_persists_a_durable_url() {
    let store = FakeStore::with(vec![monster(1)]);
    let image = Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/x.png".into())));
    let h = harness(store, image, no_text());

    let url = h.pipeline.run_image_stage(1).await.unwrap();

    // Durable URL lives on the blob store domain, not the AI service's.
    assert!(url.starts_with("https://blobs.test/ai-images/"));
    assert_eq!(h.store.get(1).ai_image_url.as_deref(), Some(url.as_str()));
    assert_eq!(h.blobs.puts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn image_stage_with_empty_upstream_leaves_record_untouched() {
    let store = FakeStore::with(vec![monster(1)]);
    let h = harness(store, Arc::new(FixedImage(None)), no_text());

    let err = h.pipeline.run_image_stage(1).await.unwrap_err();

    assert_matches!(err, StageError::UpstreamEmpty);
    assert_eq!(h.store.get(1).ai_image_url, None);
    assert!(h.blobs.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn image_stage_fails_not_found_for_unknown_id() {
    let store = FakeStore::with(vec![]);
    let image = Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/x.png".into())));
    let h = harness(store, image, no_text());

    let err = h.pipeline.run_image_stage(42).await.unwrap_err();
    assert_matches!(err, StageError::NotFound { id: 42 });
}

#[tokio::test]
async fn image_stage_runs_at_most_once_per_record() {
    let mut enriched = monster(1);
    enriched.ai_image_url = Some("https://blobs.test/ai-images/already.png".into());
    let store = FakeStore::with(vec![enriched]);
    let image = Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/x.png".into())));
    let h = harness(store, image, no_text());

    let err = h.pipeline.run_image_stage(1).await.unwrap_err();

    assert_matches!(err, StageError::NotEligible { .. });
    // The existing URL was not overwritten.
    assert_eq!(
        h.store.get(1).ai_image_url.as_deref(),
        Some("https://blobs.test/ai-images/already.png")
    );
}

#[tokio::test]
async fn image_stage_storage_failure_writes_nothing_to_the_record() {
    let store = FakeStore::with(vec![monster(1)]);
    let blobs = Arc::new(MemoryBlobStore {
        puts: Mutex::new(Vec::new()),
        reject: true,
    });
    let materializer = AssetMaterializer::new(Arc::new(FixedFetcher), blobs, "ai-images");
    let pipeline = EnrichmentPipeline::new(
        store.clone(),
        Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/x.png".into()))),
        no_text(),
        materializer,
    );

    let err = pipeline.run_image_stage(1).await.unwrap_err();

    assert_matches!(err, StageError::Materialize(MaterializeError::Storage(_)));
    assert_eq!(store.get(1).ai_image_url, None);
}

#[tokio::test]
async fn image_stage_reports_persistence_failure_after_upload() {
    let store = FakeStore::failing_writes(vec![monster(1)]);
    let image = Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/x.png".into())));
    let h = harness(store, image, no_text());

    let err = h.pipeline.run_image_stage(1).await.unwrap_err();

    assert_matches!(err, StageError::Persistence(_));
    // The blob made it to durable storage before the write failed; the
    // orphan is the accepted cost of a caller-initiated retry.
    assert_eq!(h.blobs.puts.lock().unwrap().len(), 1);
    assert_eq!(h.store.get(1).ai_image_url, None);
}

// ---------------------------------------------------------------------------
// Metadata stage
// ---------------------------------------------------------------------------

fn image_generated(id: DbId) -> Monster {
    let mut m = monster(id);
    m.ai_image_url = Some(format!("https://blobs.test/ai-images/{id}.png"));
    m
}

fn metadata_generated(id: DbId) -> Monster {
    let mut m = image_generated(id);
    m.monster_name = Some("Bobo".into());
    m.description = Some("A round purple friend who loves berries.".into());
    m
}

#[tokio::test]
async fn metadata_stage_persists_name_and_description_together() {
    let store = FakeStore::with(vec![image_generated(1)]);
    let text = ScriptedText::new(&[PROFILE_JSON]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let profile = h.pipeline.run_metadata_stage(1).await.unwrap();

    assert_eq!(profile.monster_name, "Bobo");
    assert_eq!(profile.traits, "Brave and a little clumsy.");

    let record = h.store.get(1);
    assert_eq!(record.monster_name.as_deref(), Some("Bobo"));
    assert_eq!(
        record.description.as_deref(),
        Some("A round purple friend who loves berries.")
    );
}

#[tokio::test]
async fn metadata_stage_fails_closed_on_malformed_json() {
    let store = FakeStore::with(vec![image_generated(1)]);
    let text = ScriptedText::new(&["Sure! Here is your monster: Bobo the berry lover."]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let err = h.pipeline.run_metadata_stage(1).await.unwrap_err();

    // The raw text is surfaced for diagnostics, nothing is guessed.
    assert_matches!(
        err,
        StageError::MalformedUpstreamOutput { ref raw } if raw.contains("Bobo the berry lover")
    );
    let record = h.store.get(1);
    assert_eq!(record.monster_name, None);
    assert_eq!(record.description, None);
}

#[tokio::test]
async fn metadata_stage_requires_a_required_key() {
    let store = FakeStore::with(vec![image_generated(1)]);
    // Valid JSON, but `description` is missing.
    let text = ScriptedText::new(&[r#"{"monster_name": "Bobo", "traits": "Brave"}"#]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let err = h.pipeline.run_metadata_stage(1).await.unwrap_err();
    assert_matches!(err, StageError::MalformedUpstreamOutput { .. });
    assert_eq!(h.store.get(1).monster_name, None);
}

#[tokio::test]
async fn metadata_stage_tolerates_extra_keys_in_the_output() {
    let store = FakeStore::with(vec![image_generated(1)]);
    let text = ScriptedText::new(&[
        r#"{"monster_name": "Bobo", "description": "A round purple friend.", "traits": "Brave", "mood": "sunny"}"#,
    ]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let profile = h.pipeline.run_metadata_stage(1).await.unwrap();
    assert_eq!(profile.monster_name, "Bobo");
    assert_eq!(h.store.get(1).monster_name.as_deref(), Some("Bobo"));
}

#[tokio::test]
async fn metadata_stage_is_not_eligible_before_the_image_stage() {
    let store = FakeStore::with(vec![monster(1)]);
    let text = ScriptedText::new(&[PROFILE_JSON]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let err = h.pipeline.run_metadata_stage(1).await.unwrap_err();
    assert_matches!(err, StageError::NotEligible { .. });
}

#[tokio::test]
async fn metadata_stage_overwrites_on_rerun() {
    let store = FakeStore::with(vec![metadata_generated(1)]);
    let text = ScriptedText::new(&[
        r#"{"monster_name": "Zuzu", "description": "A tiny storm cloud.", "traits": "Zappy"}"#,
    ]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    h.pipeline.run_metadata_stage(1).await.unwrap();

    let record = h.store.get(1);
    assert_eq!(record.monster_name.as_deref(), Some("Zuzu"));
    assert_eq!(record.description.as_deref(), Some("A tiny storm cloud."));
}

// ---------------------------------------------------------------------------
// Story stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn story_stage_overwrites_and_leaves_profile_untouched() {
    let store = FakeStore::with(vec![metadata_generated(1)]);
    let text = ScriptedText::new(&[
        "옛날 옛적에 율이와 보보가 살았어요...",
        "옛날 옛적에 하나와 보보가 살았어요...",
    ]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let first = h.pipeline.run_story_stage(1, "Yul").await.unwrap();
    assert_eq!(h.store.get(1).story.as_deref(), Some(first.as_str()));

    let second = h.pipeline.run_story_stage(1, "Hana").await.unwrap();
    assert_ne!(first, second);

    let record = h.store.get(1);
    assert_eq!(record.story.as_deref(), Some(second.as_str()));
    assert_eq!(record.monster_name.as_deref(), Some("Bobo"));
    assert_eq!(
        record.description.as_deref(),
        Some("A round purple friend who loves berries.")
    );
}

#[tokio::test]
async fn story_stage_rejects_empty_prose() {
    let store = FakeStore::with(vec![metadata_generated(1)]);
    let text = ScriptedText::new(&["   "]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let err = h.pipeline.run_story_stage(1, "Yul").await.unwrap_err();
    assert_matches!(err, StageError::UpstreamEmpty);
    assert_eq!(h.store.get(1).story, None);
}

#[tokio::test]
async fn story_stage_is_not_eligible_without_a_profile() {
    let store = FakeStore::with(vec![image_generated(1)]);
    let text = ScriptedText::new(&["a story"]);
    let h = harness(store, Arc::new(FixedImage(None)), text);

    let err = h.pipeline.run_story_stage(1, "Yul").await.unwrap_err();
    assert_matches!(err, StageError::NotEligible { .. });
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_pipeline_enriches_a_fresh_upload() {
    let store = FakeStore::with(vec![monster(7)]);
    let image = Arc::new(FixedImage(Some("https://cdn.upstream.ai/tmp/7.png".into())));
    let text = ScriptedText::new(&[PROFILE_JSON, "율이와 보보는 가장 친한 친구가 되었어요."]);
    let h = harness(store, image, text);

    let ai_url = h.pipeline.run_image_stage(7).await.unwrap();
    assert!(!ai_url.contains("upstream.ai"));

    h.pipeline.run_metadata_stage(7).await.unwrap();
    h.pipeline.run_story_stage(7, "Yul").await.unwrap();

    let record = h.store.get(7);
    assert_eq!(record.ai_image_url.as_deref(), Some(ai_url.as_str()));
    assert!(record.monster_name.is_some_and(|n| !n.is_empty()));
    assert!(record.description.is_some_and(|d| !d.is_empty()));
    assert!(record.story.is_some_and(|s| !s.is_empty()));
}
