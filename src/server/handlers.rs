// src/server/handlers.rs
//! Request handlers. Validation happens here, before any remote or storage
//! call; everything past validation is delegated to the services.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::error;

use crate::chat::{BlockingOutcome, ChatEvent, ChatReply, ChatService, DONE_SENTINEL};
use crate::memory::{HistoryEntry, UserProfile};
use crate::server::{AppState, ErrorResponse};

/// Bound on buffered events between the orchestrator and the SSE writer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn bad_gateway(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(message)))
}

/// User identity arrives out-of-band in the `X-User-Id` header.
fn require_user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| bad_request("X-User-Id header is required"))
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: Option<String>,
}

/// Reject missing/empty messages and messages that clean down to nothing.
fn validate_message(request: &ChatMessageRequest) -> Result<String, ApiError> {
    let raw = request.message.as_deref().unwrap_or("");
    if raw.trim().is_empty() {
        return Err(bad_request("message is required"));
    }
    ChatService::clean_message(raw)
        .ok_or_else(|| bad_request("message is empty after cleaning"))
}

// ============================================================================
// Status
// ============================================================================

pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

// ============================================================================
// Chat
// ============================================================================

/// Streaming turn. The orchestrator runs in a spawned task pushing events
/// into a bounded channel; this handler forwards each event as an SSE frame
/// as it arrives and appends the literal done sentinel once the channel
/// closes, so the sentinel is emitted even if the producer dies.
pub async fn chat_stream_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user_id = require_user_id(&headers)?;
    let message = validate_message(&request)?;

    let (tx, rx) = mpsc::channel::<ChatEvent>(EVENT_CHANNEL_CAPACITY);
    let chat = state.chat.clone();
    tokio::spawn(async move {
        if let Err(e) = chat.stream_message(&user_id, &message, tx.clone()).await {
            error!(error = %e, "streaming turn aborted");
            let _ = tx.send(ChatEvent::Error { error: e.to_string() }).await;
        }
    });

    let stream = async_stream::stream! {
        let mut rx = rx;
        while let Some(event) = rx.recv().await {
            let data = serde_json::to_string(&event).unwrap_or_default();
            yield Ok(Event::default().data(data));
        }
        yield Ok(Event::default().data(DONE_SENTINEL));
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Blocking turn: one JSON reply, or a structured error without a persisted
/// assistant message.
pub async fn chat_sync_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatMessageRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let user_id = require_user_id(&headers)?;
    let message = validate_message(&request)?;

    match state.chat.process_message(&user_id, &message).await {
        BlockingOutcome::Replied(reply) => Ok(Json(reply)),
        BlockingOutcome::Failed(e) => {
            Err(bad_gateway(format!("Failed to generate response: {e}")))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryResponse {
    pub status: &'static str,
    pub user_id: String,
    pub count: usize,
    pub history: Vec<HistoryEntry>,
}

pub async fn chat_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user_id = require_user_id(&headers)?;
    let history = state.chat.history(&user_id, query.limit).await;
    Ok(Json(HistoryResponse {
        status: "success",
        count: history.len(),
        user_id,
        history,
    }))
}

pub async fn clear_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user_id(&headers)?;
    if !state.chat.clear_history(&user_id).await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("failed to clear history")),
        ));
    }
    Ok(Json(json!({ "status": "success", "user_id": user_id })))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = require_user_id(&headers)?;
    Ok(Json(state.chat.profile(&user_id).await))
}

pub async fn chat_health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "chat",
        "available_models": state.backend.available_models(),
    }))
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReportAnswersRequest {
    pub answers: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct HolisticRequest {
    pub core_values_data: Option<Value>,
    pub big_five_data: Option<Value>,
}

fn report_response(result: Result<Value, crate::reports::ReportError>) -> Result<Json<Value>, ApiError> {
    match result {
        Ok(data) => Ok(Json(json!({ "status": "success", "data": data }))),
        Err(e) => Err(bad_gateway(e.to_string())),
    }
}

pub async fn big_five_handler(
    State(state): State<AppState>,
    Json(request): Json<ReportAnswersRequest>,
) -> Result<Json<Value>, ApiError> {
    let answers = request.answers.unwrap_or_default();
    if answers.is_empty() {
        return Err(bad_request("answers are required"));
    }
    report_response(state.reports.big_five(&answers).await)
}

pub async fn core_values_handler(
    State(state): State<AppState>,
    Json(request): Json<ReportAnswersRequest>,
) -> Result<Json<Value>, ApiError> {
    let answers = request.answers.unwrap_or_default();
    if answers.is_empty() {
        return Err(bad_request("answers are required"));
    }
    report_response(state.reports.core_values(&answers).await)
}

pub async fn holistic_handler(
    State(state): State<AppState>,
    Json(request): Json<HolisticRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(core_values_data), Some(big_five_data)) =
        (request.core_values_data, request.big_five_data)
    else {
        return Err(bad_request(
            "Both core_values_data and big_five_data are required",
        ));
    };
    report_response(state.reports.holistic(&core_values_data, &big_five_data).await)
}
