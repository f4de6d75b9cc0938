//! Store contract: bounded chronological reads, profile upsert rules,
//! per-user scoping, bulk clear.

mod common;

use common::memory_store;
use lvtong::emotion::EmotionLabel;
use lvtong::llm::Role;
use lvtong::memory::{run_migrations, ConversationStore, SqliteHistoryStore};
use sqlx::sqlite::SqlitePoolOptions;

#[tokio::test]
async fn read_is_chronological_and_bounded() {
    let store = memory_store().await;
    for i in 1..=5 {
        assert!(
            store
                .append("u1", &format!("message {i}"), Role::User, EmotionLabel::Neutral, 0)
                .await
        );
    }

    let recent = store.recent("u1", 3).await;
    assert_eq!(recent.len(), 3);
    // Newest three, oldest first.
    assert_eq!(recent[0].content, "message 3");
    assert_eq!(recent[1].content, "message 4");
    assert_eq!(recent[2].content, "message 5");

    // A limit above the row count returns everything, still ordered.
    let all = store.recent("u1", 50).await;
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].content, "message 1");
    assert_eq!(all[4].content, "message 5");
}

#[tokio::test]
async fn history_is_scoped_by_user() {
    let store = memory_store().await;
    store.append("u1", "mine", Role::User, EmotionLabel::Neutral, 0).await;
    store.append("u2", "yours", Role::User, EmotionLabel::Neutral, 0).await;

    let u1 = store.recent("u1", 10).await;
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0].content, "mine");
}

#[tokio::test]
async fn clear_removes_all_messages_for_one_user() {
    let store = memory_store().await;
    store.append("u1", "a", Role::User, EmotionLabel::Neutral, 0).await;
    store.append("u1", "b", Role::Assistant, EmotionLabel::Neutral, 12).await;
    store.append("u2", "keep", Role::User, EmotionLabel::Neutral, 0).await;

    assert!(store.clear("u1").await);
    assert!(store.recent("u1", 10).await.is_empty());
    assert_eq!(store.recent("u2", 10).await.len(), 1);
}

#[tokio::test]
async fn unknown_profile_is_default_and_idempotent() {
    let store = memory_store().await;

    let first = store.profile("ghost").await;
    let second = store.profile("ghost").await;

    for profile in [&first, &second] {
        assert!(profile.is_new);
        assert_eq!(profile.emotional_state, EmotionLabel::Neutral);
        assert!(profile.last_active.is_none());
        assert!(!profile.has_attributes());
    }
    assert_eq!(first.user_id, second.user_id);
}

#[tokio::test]
async fn profile_tracks_only_user_emotion() {
    let store = memory_store().await;

    // First message creates the profile.
    store.append("u1", "你好", Role::User, EmotionLabel::Neutral, 0).await;
    let profile = store.profile("u1").await;
    assert!(!profile.is_new);
    assert_eq!(profile.emotional_state, EmotionLabel::Neutral);
    assert!(profile.last_active.is_some());

    // A non-neutral user message moves the emotional state.
    store.append("u1", "我好难过", Role::User, EmotionLabel::Sad, 0).await;
    assert_eq!(store.profile("u1").await.emotional_state, EmotionLabel::Sad);

    // Assistant messages never touch it, whatever label they carry.
    store.append("u1", "抱抱你", Role::Assistant, EmotionLabel::Happy, 20).await;
    assert_eq!(store.profile("u1").await.emotional_state, EmotionLabel::Sad);

    // A neutral user message leaves the last known state in place.
    store.append("u1", "嗯", Role::User, EmotionLabel::Neutral, 0).await;
    assert_eq!(store.profile("u1").await.emotional_state, EmotionLabel::Sad);
}

#[tokio::test]
async fn migrations_are_idempotent_on_a_file_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");
    let url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("file sqlite");
    run_migrations(&pool).await.expect("first run");
    run_migrations(&pool).await.expect("second run");

    let store = SqliteHistoryStore::new(pool);
    assert!(store.append("u1", "持久化测试", Role::User, EmotionLabel::Neutral, 0).await);
    assert_eq!(store.recent("u1", 10).await.len(), 1);
}

#[tokio::test]
async fn roles_round_trip_through_the_store() {
    let store = memory_store().await;
    store.append("u1", "question", Role::User, EmotionLabel::Neutral, 0).await;
    store.append("u1", "answer", Role::Assistant, EmotionLabel::Neutral, 7).await;

    let history = store.recent("u1", 10).await;
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
}
