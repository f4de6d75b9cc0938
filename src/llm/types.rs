// src/llm/types.rs
//! Wire types for the chat-completion API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a message in the completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a stored role. Anything unexpected reads back as `User` so a
    /// damaged row can't break history assembly.
    pub fn from_db(s: &str) -> Self {
        match s {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the ordered message sequence sent upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Per-call overrides; `None` falls back to the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    /// Deployment model name; defaults to the configured model.
    pub model: Option<String>,
    /// Request a JSON-object response format instead of plain text.
    pub json_response: bool,
}

/// Successful blocking completion.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub tokens: u32,
}

/// Failure modes at the completion-client boundary.
///
/// Callers match on both arms of `Result<Completion, CompletionError>`;
/// nothing at this boundary panics or leaks transport errors upward.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("model {0} is missing a credential or endpoint")]
    NotConfigured(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}
