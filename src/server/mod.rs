// src/server/mod.rs
//! HTTP boundary.
//!
//! Thin dispatch over the chat and report services:
//! - GET  /api/status              - service health
//! - POST /api/chat/message        - streaming turn (SSE)
//! - POST /api/chat/message/sync   - blocking turn
//! - GET  /api/chat/history        - per-user history
//! - DELETE /api/chat/history      - per-user bulk clear
//! - GET  /api/chat/profile        - per-user profile
//! - GET  /api/chat/health         - chat health + available models
//! - POST /api/report/big_five     - Big Five report
//! - POST /api/report/core_values  - core values report
//! - POST /api/report/holistic     - holistic synthesis

pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::chat::ChatService;
use crate::config::Config;
use crate::llm::CompletionBackend;
use crate::reports::ReportService;

/// Shared handles, constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub reports: Arc<ReportService>,
    pub backend: Arc<dyn CompletionBackend>,
}

/// Uniform error body: `{"status": "error", "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { status: "error", error: error.into() }
    }
}

/// Create the router with all endpoints.
pub fn create_router(cors_origin: &str, state: AppState) -> Router {
    let allow_origin = if cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => AllowOrigin::any(),
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-user-id")]);

    Router::new()
        .route("/api/status", get(handlers::status_handler))
        .route("/api/chat/message", post(handlers::chat_stream_handler))
        .route("/api/chat/message/sync", post(handlers::chat_sync_handler))
        .route("/api/chat/history", get(handlers::chat_history_handler))
        .route("/api/chat/history", delete(handlers::clear_history_handler))
        .route("/api/chat/profile", get(handlers::profile_handler))
        .route("/api/chat/health", get(handlers::chat_health_handler))
        .route("/api/report/big_five", post(handlers::big_five_handler))
        .route("/api/report/core_values", post(handlers::core_values_handler))
        .route("/api/report/holistic", post(handlers::holistic_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server until shutdown.
pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let app = create_router(&config.cors_origin, state);
    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("listening on http://{}", bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}
