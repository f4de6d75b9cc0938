// src/memory/migration.rs
//! Schema setup for the message store. Idempotent; run at every startup.

use anyhow::Result;
use sqlx::{Executor, SqlitePool};

const CREATE_CHAT_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    emotion TEXT NOT NULL DEFAULT 'neutral',
    tokens INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL
);
"#;

const CREATE_USER_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    user_id TEXT PRIMARY KEY,
    age_range TEXT,
    personality TEXT,
    communication_style TEXT,
    interests TEXT,
    emotional_state TEXT NOT NULL DEFAULT 'neutral',
    last_active DATETIME
);
"#;

const CREATE_MESSAGE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_chat_messages_user_time
    ON chat_messages(user_id, created_at);
"#;

/// Create tables and indices if missing.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_CHAT_MESSAGES).await?;
    pool.execute(CREATE_USER_PROFILES).await?;
    pool.execute(CREATE_MESSAGE_INDEX).await?;
    Ok(())
}
