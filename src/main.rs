// src/main.rs

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lvtong::chat::ChatService;
use lvtong::config::Config;
use lvtong::llm::{CompletionBackend, CompletionClient};
use lvtong::memory::{run_migrations, SqliteHistoryStore};
use lvtong::persona::Persona;
use lvtong::reports::ReportService;
use lvtong::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("starting lvtong backend");
    info!(model = %config.default_model, db = %config.database_url, "configuration loaded");

    let db_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.sqlite_max_connections)
        .connect_with(db_options)
        .await?;
    run_migrations(&pool).await?;

    // Construct every shared component once; everything downstream receives
    // its dependencies explicitly.
    let backend: Arc<dyn CompletionBackend> = CompletionClient::new(&config)?;
    let store = Arc::new(SqliteHistoryStore::new(pool));
    let chat = Arc::new(ChatService::new(
        backend.clone(),
        store,
        Persona::Qingkong,
        &config,
    ));
    let reports = Arc::new(ReportService::new(backend.clone()));

    let state = AppState { chat, reports, backend };
    server::run(&config, state).await
}
