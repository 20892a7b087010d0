use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mondex_api::config::ServerConfig;
use mondex_api::router::build_app_router;
use mondex_api::state::AppState;
use mondex_db::store::PgMonsterStore;
use mondex_genai::{GenAiConfig, OpenAiChatClient, OpenAiImageClient};
use mondex_pipeline::EnrichmentPipeline;
use mondex_storage::{AssetMaterializer, HttpImageFetcher, S3BlobStore, S3Config};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mondex_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mondex_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mondex_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mondex_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Blob storage ---
    let blob_store = Arc::new(S3BlobStore::from_env(S3Config::from_env()).await);
    tracing::info!("Blob store ready");

    // --- Generative clients (one pooled HTTP client between them) ---
    let genai_config = GenAiConfig::from_env();
    let http = reqwest::Client::new();
    let image_client = Arc::new(OpenAiImageClient::with_client(
        http.clone(),
        genai_config.clone(),
    ));
    let chat_client = Arc::new(OpenAiChatClient::with_client(http.clone(), genai_config));

    // --- Enrichment pipeline ---
    let materializer = AssetMaterializer::new(
        Arc::new(HttpImageFetcher::with_client(http)),
        blob_store.clone(),
        "ai-images",
    );
    let pipeline = Arc::new(EnrichmentPipeline::new(
        Arc::new(PgMonsterStore::new(pool.clone())),
        image_client,
        chat_client,
        materializer,
    ));

    // --- Router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store,
        pipeline,
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("Server exited with an error");
}
