// src/llm/client.rs
//! Client for the hosted chat-completion API.
//!
//! Blocking calls return a tagged result the orchestrator must match on;
//! streaming calls hand back a channel of text deltas. Neither path lets a
//! transport error escape as a panic or an unhandled fault.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as ReqwestClient;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::llm::registry::{ModelEntry, ModelRegistry};
use crate::llm::sse::{SseDecoder, StreamChunk};
use crate::llm::types::{ChatMessage, Completion, CompletionError, CompletionOptions};

/// Bound on in-flight fragments between the producer task and the consumer.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Seam the orchestrator and report generators depend on, so a scripted
/// backend can stand in for the remote API in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Blocking completion: full text plus the upstream token count.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError>;

    /// Incremental completion: a bounded channel of text deltas. The channel
    /// closing is the only termination signal; a failed connection closes it
    /// after zero elements instead of surfacing an error.
    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> mpsc::Receiver<String>;

    /// Models currently configured with both a credential and an endpoint.
    fn available_models(&self) -> Vec<String>;
}

/// Per-call defaults taken from configuration.
#[derive(Debug, Clone)]
struct CompletionDefaults {
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

pub struct CompletionClient {
    http: ReqwestClient,
    registry: ModelRegistry,
    defaults: CompletionDefaults,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Result<Arc<Self>> {
        Self::with_registry(config, ModelRegistry::from_env())
    }

    pub fn with_registry(config: &Config, registry: ModelRegistry) -> Result<Arc<Self>> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        info!(
            model = %config.default_model,
            available = ?registry.available_models(),
            "initializing completion client"
        );

        Ok(Arc::new(Self {
            http,
            registry,
            defaults: CompletionDefaults {
                model: config.default_model.clone(),
                temperature: config.default_temperature,
                max_tokens: config.default_max_tokens,
                top_p: config.default_top_p,
            },
        }))
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    fn resolve_model<'a>(
        &'a self,
        options: &'a CompletionOptions,
    ) -> Result<&'a ModelEntry, CompletionError> {
        let name = options.model.as_deref().unwrap_or(&self.defaults.model);
        self.registry.resolve(name)
    }

    fn request_body(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
        stream: bool,
    ) -> Value {
        let response_format = if options.json_response {
            json!({ "type": "json_object" })
        } else {
            json!({ "type": "text" })
        };

        let mut body = json!({
            "messages": messages,
            "temperature": options.temperature.unwrap_or(self.defaults.temperature),
            "top_p": options.top_p.unwrap_or(self.defaults.top_p),
            "max_tokens": options.max_tokens.unwrap_or(self.defaults.max_tokens),
            "response_format": response_format,
        });
        if stream {
            body["stream"] = json!(true);
        }
        body
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, CompletionError> {
        let entry = self.resolve_model(options).map_err(|e| {
            error!(error = %e, "completion rejected before dispatch");
            e
        })?;
        let model = entry.name.clone();
        let body = self.request_body(messages, options, false);

        debug!(model = %model, messages = messages.len(), "dispatching completion");
        let started = Instant::now();

        let response = self
            .http
            .post(&entry.endpoint)
            .header("api-key", &entry.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %model, elapsed = ?started.elapsed(), error = %e, "completion transport failed");
                CompletionError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!(model = %model, %status, elapsed = ?started.elapsed(), "completion API error");
            return Err(CompletionError::Transport(format!("{status}: {text}")));
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!(model = %model, error = %e, "completion body was not JSON");
            CompletionError::Transport(e.to_string())
        })?;

        let text = payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!(model = %model, "completion response missing choices[0].message.content");
                CompletionError::MalformedResponse("missing message content".into())
            })?;
        let tokens = payload["usage"]["total_tokens"].as_u64().unwrap_or(0) as u32;

        info!(
            model = %model,
            tokens,
            elapsed = ?started.elapsed(),
            "completion finished"
        );
        Ok(Completion { text, tokens })
    }

    async fn complete_stream(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        // Any failure before the first byte degrades to an empty stream:
        // the receiver closes with zero elements and the caller falls back.
        let entry = match self.resolve_model(options) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "stream rejected before dispatch");
                return rx;
            }
        };
        let model = entry.name.clone();
        let body = self.request_body(messages, options, true);

        debug!(model = %model, messages = messages.len(), "dispatching streaming completion");
        let started = Instant::now();

        let response = match self
            .http
            .post(&entry.endpoint)
            .header("api-key", &entry.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(model = %model, status = %response.status(), "streaming completion API error");
                return rx;
            }
            Err(e) => {
                warn!(model = %model, elapsed = ?started.elapsed(), error = %e, "streaming transport failed");
                return rx;
            }
        };

        tokio::spawn(forward_deltas(model, response, tx));
        rx
    }

    fn available_models(&self) -> Vec<String> {
        self.registry.available_models()
    }
}

/// Producer half of the streaming channel: decode the SSE body and push each
/// text delta. Terminates on `[DONE]`, transport close, or a gone receiver;
/// malformed frames are skipped without ending the stream.
async fn forward_deltas(model: String, response: reqwest::Response, tx: mpsc::Sender<String>) {
    let started = Instant::now();
    let mut byte_stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    let mut fragments = 0usize;

    'receive: while let Some(chunk) = byte_stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(model = %model, error = %e, "stream read failed, ending early");
                break;
            }
        };

        for frame in decoder.push(&chunk) {
            if frame.is_done() {
                break 'receive;
            }
            let Some(parsed) = frame.try_parse::<StreamChunk>() else {
                continue;
            };
            if let Some(delta) = parsed.delta_text() {
                if delta.is_empty() {
                    continue;
                }
                fragments += 1;
                if tx.send(delta).await.is_err() {
                    debug!(model = %model, "stream consumer dropped, stopping");
                    break 'receive;
                }
            }
        }
    }

    info!(
        model = %model,
        fragments,
        elapsed = ?started.elapsed(),
        "streaming completion finished"
    );
}
