// src/memory/types.rs
//! Persistence-facing types for messages and user profiles.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::emotion::EmotionLabel;
use crate::llm::Role;

/// One persisted chat message. Immutable once written; rows are only ever
/// removed by the per-user bulk clear.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub content: String,
    pub emotion: EmotionLabel,
    /// Upstream token count; always 0 for user-authored messages.
    pub tokens: u32,
    pub timestamp: DateTime<Utc>,
}

/// What history reads expose to prompt assembly and the history API.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Profile attached to a user identity. Attribute fields are independently
/// optional: "absent" and "empty" are different things, and absent fields
/// are never rendered into prompts.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub age_range: Option<String>,
    pub personality: Option<String>,
    pub communication_style: Option<String>,
    pub interests: Option<String>,
    /// Most recent non-neutral classification of a *user* message.
    pub emotional_state: EmotionLabel,
    pub last_active: Option<DateTime<Utc>>,
    /// True when no row exists yet for this identity.
    pub is_new: bool,
}

impl UserProfile {
    /// Default profile for an identity that has never written a message.
    pub fn new_user(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            age_range: None,
            personality: None,
            communication_style: None,
            interests: None,
            emotional_state: EmotionLabel::Neutral,
            last_active: None,
            is_new: true,
        }
    }

    /// Whether any descriptive attribute is present.
    pub fn has_attributes(&self) -> bool {
        self.age_range.is_some()
            || self.personality.is_some()
            || self.communication_style.is_some()
            || self.interests.is_some()
    }
}
