//! Shared fixtures: a scripted completion backend and an in-memory store.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::mpsc;

use lvtong::config::Config;
use lvtong::llm::{
    ChatMessage, Completion, CompletionBackend, CompletionError, CompletionOptions,
};
use lvtong::memory::{run_migrations, SqliteHistoryStore};

enum MockBehavior {
    Reply { fragments: Vec<String>, tokens: u32 },
    Fail,
}

/// Completion backend with scripted output, standing in for the remote API.
pub struct MockBackend {
    behavior: MockBehavior,
}

impl MockBackend {
    /// Backend that streams the given fragments and, in blocking mode,
    /// returns their concatenation with the given token count.
    pub fn replying(fragments: &[&str], tokens: u32) -> Arc<Self> {
        Arc::new(Self {
            behavior: MockBehavior::Reply {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                tokens,
            },
        })
    }

    /// Backend whose model is never configured: blocking calls fail,
    /// streams close with zero elements.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self { behavior: MockBehavior::Fail })
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<Completion, CompletionError> {
        match &self.behavior {
            MockBehavior::Reply { fragments, tokens } => Ok(Completion {
                text: fragments.concat(),
                tokens: *tokens,
            }),
            MockBehavior::Fail => Err(CompletionError::NotConfigured("4o".into())),
        }
    }

    async fn complete_stream(
        &self,
        _messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(16);
        if let MockBehavior::Reply { fragments, .. } = &self.behavior {
            let fragments = fragments.clone();
            tokio::spawn(async move {
                for fragment in fragments {
                    if tx.send(fragment).await.is_err() {
                        break;
                    }
                }
            });
        }
        rx
    }

    fn available_models(&self) -> Vec<String> {
        match self.behavior {
            MockBehavior::Reply { .. } => vec!["4o".into()],
            MockBehavior::Fail => Vec::new(),
        }
    }
}

/// Fresh in-memory store with the schema applied.
pub async fn memory_store() -> Arc<SqliteHistoryStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    Arc::new(SqliteHistoryStore::new(pool))
}

pub fn test_config() -> Config {
    Config::from_env()
}
