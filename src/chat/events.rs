// src/chat/events.rs
//! Frames emitted over a streaming chat turn.

use serde::Serialize;

/// Terminal marker written by the transport after the event channel closes.
/// Deliberately NOT a JSON frame: clients match it literally.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Events produced by the orchestrator during a streaming turn.
///
/// A consumer sees exactly one `start`, zero or more `content` frames, then
/// either `end` or the error-substitute content frame, and finally the
/// literal done sentinel appended by the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEvent {
    Start,
    Content { content: String },
    End,
    Error { error: String },
}
