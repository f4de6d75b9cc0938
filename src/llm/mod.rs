// src/llm/mod.rs

pub mod client;
pub mod registry;
pub mod sse;
pub mod types;

pub use client::{CompletionBackend, CompletionClient};
pub use registry::ModelRegistry;
pub use types::{ChatMessage, Completion, CompletionError, CompletionOptions, Role};
