// src/main.rs

use exam_results::config::Config;
use exam_results::routes;
use exam_results::services::enricher::{HttpExamDetailSource, QuestionEnricher};
use exam_results::services::leaderboard::EstimatedLeaderboard;
use exam_results::state::AppState;
use exam_results::store::{FileStore, KeyValueStore, PgStore, ResultStore};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let backend: Arc<dyn KeyValueStore> = match &config.database_url {
        Some(database_url) => Arc::new(PgStore::new(connect_database(database_url).await)),
        None => {
            let store = FileStore::open(&config.result_store_dir)
                .await
                .expect("Failed to open result store directory");
            tracing::info!("Storing results in {:?}", store.dir());
            Arc::new(store)
        }
    };

    let http_client = reqwest::Client::new();
    let detail_source = HttpExamDetailSource::new(http_client, config.exam_api_url.clone());

    // Create AppState
    let state = AppState {
        store: ResultStore::new(backend),
        enricher: QuestionEnricher::new(Arc::new(detail_source)),
        leaderboard: Arc::new(EstimatedLeaderboard::default()),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

/// Connects to Postgres with retry and applies migrations.
async fn connect_database(database_url: &str) -> sqlx::PgPool {
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    pool
}
