// src/memory/mod.rs

pub mod migration;
pub mod store;
pub mod types;

pub use migration::run_migrations;
pub use store::{ConversationStore, SqliteHistoryStore};
pub use types::{HistoryEntry, MessageRecord, UserProfile};
