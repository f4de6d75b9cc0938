// src/memory/store.rs
//! SQLite-backed conversation history and profile store.
//!
//! The public trait is best-effort by contract: persistence failures are
//! logged here and surface as `false` / empty values, never as errors. The
//! orchestrator keeps serving a degraded turn instead of failing it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::emotion::EmotionLabel;
use crate::llm::Role;
use crate::memory::types::{HistoryEntry, MessageRecord, UserProfile};

/// Storage seam the orchestrator depends on.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist one message and upsert the owner's profile. Returns whether
    /// the write landed.
    async fn append(
        &self,
        user_id: &str,
        content: &str,
        role: Role,
        emotion: EmotionLabel,
        tokens: u32,
    ) -> bool;

    /// Newest `limit` messages for one identity, in chronological order
    /// (oldest first). Empty on failure.
    async fn recent(&self, user_id: &str, limit: usize) -> Vec<HistoryEntry>;

    /// Remove every message belonging to one identity.
    async fn clear(&self, user_id: &str) -> bool;

    /// Profile for an identity; a default profile tagged `is_new` when the
    /// identity has never been seen. Idempotent.
    async fn profile(&self, user_id: &str) -> UserProfile;
}

pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn try_append(
        &self,
        user_id: &str,
        content: &str,
        role: Role,
        emotion: EmotionLabel,
        tokens: u32,
    ) -> Result<()> {
        let record = MessageRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            role,
            content: content.to_string(),
            emotion,
            tokens,
            timestamp: Utc::now(),
        };
        let now = record.timestamp.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, user_id, role, content, emotion, tokens, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.role.as_str())
        .bind(&record.content)
        .bind(record.emotion.as_str())
        .bind(record.tokens as i64)
        .bind(now)
        .execute(&self.pool)
        .await?;

        // Only a user's own non-neutral message moves the profile's
        // emotional state; every append refreshes last_active.
        if role == Role::User && emotion != EmotionLabel::Neutral {
            sqlx::query(
                r#"
                INSERT INTO user_profiles (user_id, emotional_state, last_active)
                VALUES (?, ?, ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    emotional_state = excluded.emotional_state,
                    last_active = excluded.last_active
                "#,
            )
            .bind(user_id)
            .bind(emotion.as_str())
            .bind(now)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO user_profiles (user_id, emotional_state, last_active)
                VALUES (?, 'neutral', ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    last_active = excluded.last_active
                "#,
            )
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn try_recent(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT role, content
            FROM chat_messages
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut entries: Vec<HistoryEntry> = rows
            .into_iter()
            .map(|row| {
                let role: String = row.get("role");
                let content: String = row.get("content");
                HistoryEntry { role: Role::from_db(&role), content }
            })
            .collect();

        // Read newest-first for the LIMIT, expose oldest-first.
        entries.reverse();
        Ok(entries)
    }

    async fn try_clear(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM chat_messages WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn try_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, age_range, personality, communication_style, interests,
                   emotional_state, last_active
            FROM user_profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let emotional_state: String = row.get("emotional_state");
            let last_active: Option<NaiveDateTime> = row.get("last_active");
            UserProfile {
                user_id: row.get("user_id"),
                age_range: row.get("age_range"),
                personality: row.get("personality"),
                communication_style: row.get("communication_style"),
                interests: row.get("interests"),
                emotional_state: emotional_state.parse().unwrap_or(EmotionLabel::Neutral),
                last_active: last_active.map(|ts| Utc.from_utc_datetime(&ts)),
                is_new: false,
            }
        }))
    }
}

#[async_trait]
impl ConversationStore for SqliteHistoryStore {
    async fn append(
        &self,
        user_id: &str,
        content: &str,
        role: Role,
        emotion: EmotionLabel,
        tokens: u32,
    ) -> bool {
        match self.try_append(user_id, content, role, emotion, tokens).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user = user_id, role = %role, error = %e, "failed to persist message");
                false
            }
        }
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Vec<HistoryEntry> {
        match self.try_recent(user_id, limit).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user = user_id, error = %e, "history read failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn clear(&self, user_id: &str) -> bool {
        match self.try_clear(user_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user = user_id, error = %e, "history clear failed");
                false
            }
        }
    }

    async fn profile(&self, user_id: &str) -> UserProfile {
        match self.try_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::new_user(user_id),
            Err(e) => {
                warn!(user = user_id, error = %e, "profile read failed, using default");
                UserProfile::new_user(user_id)
            }
        }
    }
}
