// src/chat/mod.rs
//! Turn orchestration: classify, recall, prompt, complete, persist.
//!
//! Both entry points follow the same shape: classify the inbound text,
//! load the profile and recent history, build the system prompt, persist the
//! user side, then call the completion backend. Failures from the backend or
//! the store never abort a turn: the streaming path substitutes a warm
//! fallback reply, the blocking path returns a structured error outcome.

pub mod events;

pub use events::{ChatEvent, DONE_SENTINEL};

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::emotion::{classify, EmotionLabel};
use crate::llm::{ChatMessage, CompletionBackend, CompletionError, CompletionOptions, Role};
use crate::memory::{ConversationStore, HistoryEntry, UserProfile};
use crate::persona::Persona;
use crate::prompt::build_system_prompt;

/// Trailing instructional marker some clients smuggle in front of the real
/// message. Everything up to and including its last occurrence is dropped.
pub const PROMPT_MARKER: &str = "注意聊天需要简短像朋友聊天一样不要长篇大论。";

/// Reply used in place of a failed generation, persisted as the assistant
/// turn so the conversation stays coherent.
pub const FALLBACK_REPLY: &str =
    "抱歉，我刚刚有点走神了。不过我一直在这里陪着你，你想聊什么都可以和我说说。";

/// Successful blocking turn, as returned to the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub status: &'static str,
    pub response: String,
    pub tokens_used: u32,
    pub emotional_state: EmotionLabel,
    pub persona: &'static str,
}

/// Outcome of a blocking turn. Both arms are expected: upstream failure is
/// an ordinary result here, not an exception.
#[derive(Debug)]
pub enum BlockingOutcome {
    Replied(ChatReply),
    Failed(CompletionError),
}

pub struct ChatService {
    backend: Arc<dyn CompletionBackend>,
    store: Arc<dyn ConversationStore>,
    persona: Persona,
    history_prompt_limit: usize,
    history_default_limit: usize,
    history_max_limit: usize,
}

impl ChatService {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        store: Arc<dyn ConversationStore>,
        persona: Persona,
        config: &Config,
    ) -> Self {
        Self {
            backend,
            store,
            persona,
            history_prompt_limit: config.history_prompt_limit,
            history_default_limit: config.history_default_limit,
            history_max_limit: config.history_max_limit,
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// Strip the instructional marker and everything before it, keeping only
    /// the user's actual message. `None` means the message is empty after
    /// cleaning and the turn must be rejected as invalid input.
    pub fn clean_message(raw: &str) -> Option<String> {
        let text = match raw.rfind(PROMPT_MARKER) {
            Some(pos) => &raw[pos + PROMPT_MARKER.len()..],
            None => raw,
        };
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Classify, recall, and assemble the upstream message sequence for one
    /// turn. Shared by both entry points.
    async fn prepare_turn(
        &self,
        user_id: &str,
        message: &str,
    ) -> (EmotionLabel, Vec<ChatMessage>) {
        let emotion = classify(message);
        let profile = self.store.profile(user_id).await;
        let prior = profile.emotional_state;
        debug!(user = user_id, current = %emotion, prior = %prior, "classified turn");

        let history = self.store.recent(user_id, self.history_prompt_limit).await;
        let profile_ref = if profile.is_new { None } else { Some(&profile) };
        let system = build_system_prompt(self.persona, profile_ref, emotion, prior);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        for HistoryEntry { role, content } in history {
            messages.push(ChatMessage { role, content });
        }
        messages.push(ChatMessage::user(message));

        (emotion, messages)
    }

    /// Streaming turn. Emits `Start`, forwards each fragment as `Content`,
    /// then `End`; a generation that produces nothing is replaced by a single
    /// fallback `Content` frame. The user message is persisted before the
    /// remote call, the assistant message after; both writes are best-effort.
    /// Dropping `tx` (returning) is what lets the transport append the done
    /// sentinel.
    pub async fn stream_message(
        &self,
        user_id: &str,
        message: &str,
        tx: mpsc::Sender<ChatEvent>,
    ) -> Result<()> {
        let (emotion, messages) = self.prepare_turn(user_id, message).await;

        let _ = tx.send(ChatEvent::Start).await;
        self.store
            .append(user_id, message, Role::User, emotion, 0)
            .await;

        let mut fragments = self
            .backend
            .complete_stream(&messages, &CompletionOptions::default())
            .await;

        let mut full_response = String::new();
        let mut client_gone = false;
        while let Some(fragment) = fragments.recv().await {
            full_response.push_str(&fragment);
            if !client_gone
                && tx.send(ChatEvent::Content { content: fragment }).await.is_err()
            {
                // Consumer went away; keep draining so the turn still
                // persists in full.
                client_gone = true;
            }
        }

        if full_response.is_empty() {
            warn!(user = user_id, "stream produced no fragments, substituting fallback reply");
            if !client_gone {
                let _ = tx
                    .send(ChatEvent::Content { content: FALLBACK_REPLY.to_string() })
                    .await;
            }
            self.store
                .append(user_id, FALLBACK_REPLY, Role::Assistant, EmotionLabel::Neutral, 0)
                .await;
            return Ok(());
        }

        if !client_gone {
            let _ = tx.send(ChatEvent::End).await;
        }
        self.store
            .append(user_id, &full_response, Role::Assistant, EmotionLabel::Neutral, 0)
            .await;

        info!(
            user = user_id,
            chars = full_response.len(),
            emotion = %emotion,
            "streaming turn complete"
        );
        Ok(())
    }

    /// Blocking turn. The user message is persisted before the call; the
    /// assistant side only on success. Upstream failure comes back as
    /// `BlockingOutcome::Failed`, never as an error.
    pub async fn process_message(&self, user_id: &str, message: &str) -> BlockingOutcome {
        let (emotion, messages) = self.prepare_turn(user_id, message).await;

        self.store
            .append(user_id, message, Role::User, emotion, 0)
            .await;

        match self
            .backend
            .complete(&messages, &CompletionOptions::default())
            .await
        {
            Ok(completion) => {
                self.store
                    .append(
                        user_id,
                        &completion.text,
                        Role::Assistant,
                        EmotionLabel::Neutral,
                        completion.tokens,
                    )
                    .await;
                info!(
                    user = user_id,
                    tokens = completion.tokens,
                    emotion = %emotion,
                    "blocking turn complete"
                );
                BlockingOutcome::Replied(ChatReply {
                    status: "success",
                    response: completion.text,
                    tokens_used: completion.tokens,
                    emotional_state: emotion,
                    persona: self.persona.name(),
                })
            }
            Err(e) => {
                warn!(user = user_id, error = %e, "blocking turn failed upstream");
                BlockingOutcome::Failed(e)
            }
        }
    }

    /// History for the API, clamped to the configured maximum.
    pub async fn history(&self, user_id: &str, limit: Option<usize>) -> Vec<HistoryEntry> {
        let limit = limit
            .unwrap_or(self.history_default_limit)
            .min(self.history_max_limit);
        self.store.recent(user_id, limit).await
    }

    pub async fn clear_history(&self, user_id: &str) -> bool {
        self.store.clear(user_id).await
    }

    pub async fn profile(&self, user_id: &str) -> UserProfile {
        self.store.profile(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_strips_marker_and_prefix() {
        let raw = format!("...{PROMPT_MARKER}Hello");
        assert_eq!(ChatService::clean_message(&raw).as_deref(), Some("Hello"));
    }

    #[test]
    fn cleaning_keeps_text_after_last_marker() {
        let raw = format!("a{PROMPT_MARKER}b{PROMPT_MARKER}真正的消息");
        assert_eq!(
            ChatService::clean_message(&raw).as_deref(),
            Some("真正的消息")
        );
    }

    #[test]
    fn cleaning_leaves_unmarked_text_alone() {
        assert_eq!(
            ChatService::clean_message("今天过得怎么样").as_deref(),
            Some("今天过得怎么样")
        );
    }

    #[test]
    fn cleaning_rejects_empty_results() {
        assert_eq!(ChatService::clean_message(""), None);
        assert_eq!(ChatService::clean_message("   "), None);
        let only_marker = format!("联系上下文{PROMPT_MARKER}");
        assert_eq!(ChatService::clean_message(&only_marker), None);
        let marker_then_space = format!("{PROMPT_MARKER}   ");
        assert_eq!(ChatService::clean_message(&marker_then_space), None);
    }
}
