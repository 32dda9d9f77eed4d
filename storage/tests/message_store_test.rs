//! Integration tests for edit history, analyses and summary queries.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use storage::{
    analysis_repo, digest_repo, group_repo, history_repo, message_repo, user_repo, ChatStore,
    GroupUpsert, MediaKind, MessageUpsert, NewAnalysis, UserUpsert,
};
use tempfile::TempDir;

async fn fresh_store() -> (TempDir, ChatStore) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("messages.db");
    let store = ChatStore::connect(path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to open store");
    (dir, store)
}

async fn user(store: &ChatStore, external_id: i64, first_name: &str) -> String {
    user_repo::upsert_user(
        store.pool(),
        &UserUpsert {
            external_id,
            first_name: Some(first_name.to_string()),
            ..UserUpsert::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn group(store: &ChatStore, external_id: i64) -> String {
    group_repo::upsert_group(
        store.pool(),
        &GroupUpsert {
            external_id,
            title: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// **Test: History lists edits newest first and cascades with the message.**
///
/// **Setup:** One message, two history rows.
/// **Action:** `list_history`; then delete the message row directly.
/// **Expected:** Newest edit first; no history rows left after deletion.
#[tokio::test]
async fn test_history_order_and_cascade() {
    let (_dir, store) = fresh_store().await;
    let author = user(&store, 1, "Ali").await;
    let group_id = group(&store, 7).await;
    let message = message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(1, &group_id, &author, Some("C".to_string()), Utc::now()),
    )
    .await
    .unwrap();

    let meta = json!({"event_type": "edited_message"});
    history_repo::insert_history(store.pool(), &message.id, Some("A"), Some("B"), &meta)
        .await
        .unwrap();
    history_repo::insert_history(store.pool(), &message.id, Some("B"), Some("C"), &meta)
        .await
        .unwrap();

    let history = history_repo::list_history(store.pool(), &message.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_text.as_deref(), Some("B"));
    assert_eq!(history[1].new_text.as_deref(), Some("B"));
    assert_eq!(history[0].metadata.0["event_type"], "edited_message");

    sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(&message.id)
        .execute(store.pool())
        .await
        .unwrap();
    assert!(history_repo::list_history(store.pool(), &message.id)
        .await
        .unwrap()
        .is_empty());
}

/// **Test: Deleting a reply target nulls the reference instead of cascading.**
#[tokio::test]
async fn test_reply_reference_set_null() {
    let (_dir, store) = fresh_store().await;
    let author = user(&store, 1, "Ali").await;
    let group_id = group(&store, 7).await;
    let target = message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(1, &group_id, &author, Some("q".to_string()), Utc::now()),
    )
    .await
    .unwrap();
    let mut reply = MessageUpsert::text(2, &group_id, &author, Some("a".to_string()), Utc::now());
    reply.reply_to_external_id = Some(1);
    reply.reply_to_id = Some(target.id.clone());
    let reply = message_repo::upsert_message(store.pool(), &reply).await.unwrap();
    assert!(reply.is_reply());

    sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(&target.id)
        .execute(store.pool())
        .await
        .unwrap();

    let reply = message_repo::get_message(store.pool(), &reply.id)
        .await
        .unwrap()
        .expect("reply survives");
    assert_eq!(reply.reply_to_id, None);
    assert_eq!(reply.reply_to_external_id, Some(1));
}

/// **Test: Analysis upsert replaces the single row for a message.**
#[tokio::test]
async fn test_analysis_upsert_replaces() {
    let (_dir, store) = fresh_store().await;
    let author = user(&store, 1, "Ali").await;
    let group_id = group(&store, 7).await;
    let message = message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(1, &group_id, &author, Some("x".to_string()), Utc::now()),
    )
    .await
    .unwrap();

    let mut analysis = NewAnalysis {
        message_id: message.id.clone(),
        topic: "salary".to_string(),
        sentiment: "positive".to_string(),
        sentiment_score: 0.8,
        intent: "question".to_string(),
        keywords: vec!["maosh".to_string()],
        is_question: true,
        analyzer: "ai".to_string(),
    };
    let first = analysis_repo::upsert_analysis(store.pool(), &analysis)
        .await
        .unwrap();
    analysis.sentiment = "negative".to_string();
    analysis.sentiment_score = -0.8;
    let second = analysis_repo::upsert_analysis(store.pool(), &analysis)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let stored = analysis_repo::get_analysis(store.pool(), &message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.sentiment, "negative");
    assert_eq!(stored.sentiment_score, -0.8);
    assert_eq!(stored.keywords.0, vec!["maosh"]);
}

/// **Test: Digest queries return the newest window oldest-first with author names.**
#[tokio::test]
async fn test_digest_queries() {
    let (_dir, store) = fresh_store().await;
    let ali = user(&store, 1, "Ali").await;
    let vali = user(&store, 2, "Vali").await;
    let hr = group(&store, 7).await;
    let ops = group(&store, 8).await;
    let now = Utc::now();

    let old = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(1, &hr, &ali, Some("ancient".to_string()), old),
    )
    .await
    .unwrap();
    message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(2, &hr, &vali, Some("first".to_string()), now - Duration::hours(2)),
    )
    .await
    .unwrap();
    let mut photo = MessageUpsert::text(3, &hr, &ali, None, now - Duration::hours(1));
    photo.media_kind = MediaKind::Photo;
    message_repo::upsert_message(store.pool(), &photo).await.unwrap();
    message_repo::upsert_message(
        store.pool(),
        &MessageUpsert::text(1, &ops, &vali, Some("ops".to_string()), now),
    )
    .await
    .unwrap();

    let recent = digest_repo::recent_in_group(store.pool(), &hr, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].summary_text(), "first");
    assert_eq!(recent[0].author_name(), "Vali");
    assert_eq!(recent[1].summary_text(), "[photo]");

    let cutoff = now - Duration::days(7);
    let counts = digest_repo::window_counts(store.pool(), cutoff).await.unwrap();
    assert_eq!(counts.messages, 3);
    assert_eq!(counts.groups, 2);
    assert_eq!(counts.users, 2);

    let since = digest_repo::messages_since(store.pool(), cutoff, 100)
        .await
        .unwrap();
    let texts: Vec<String> = since.iter().map(|m| m.summary_text()).collect();
    assert_eq!(texts, vec!["first", "[photo]", "ops"]);
}
