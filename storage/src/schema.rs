//! Table definitions. Idempotent; run on every start.

use sqlx::SqlitePool;
use tracing::info;

pub(crate) async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Creating database tables if not exist");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_users (
            id TEXT PRIMARY KEY,
            external_id INTEGER NOT NULL UNIQUE,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            is_bot INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_groups (
            id TEXT PRIMARY KEY,
            external_id INTEGER NOT NULL UNIQUE,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            external_message_id INTEGER NOT NULL,
            group_id TEXT NOT NULL REFERENCES chat_groups(id) ON DELETE CASCADE,
            author_id TEXT NOT NULL REFERENCES chat_users(id) ON DELETE CASCADE,
            text TEXT,
            media_kind TEXT NOT NULL DEFAULT 'text',
            media_file_id TEXT,
            media_file_unique_id TEXT,
            media_file_size INTEGER,
            media_mime_type TEXT,
            media_file_path TEXT,
            media_file_name TEXT,
            reply_to_external_id INTEGER,
            reply_to_id TEXT REFERENCES messages(id) ON DELETE SET NULL,
            forward_from_user_id INTEGER,
            forward_from_chat_id INTEGER,
            raw_json TEXT NOT NULL DEFAULT '{}',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            is_edited INTEGER NOT NULL DEFAULT 0,
            created_at_source TEXT NOT NULL,
            edited_at_source TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            sentiment TEXT,
            topics TEXT NOT NULL DEFAULT '[]',
            ai_processed INTEGER NOT NULL DEFAULT 0,
            ai_processed_at TEXT,
            ai_error TEXT,
            revision INTEGER NOT NULL DEFAULT 1,
            ai_revision INTEGER,
            UNIQUE (external_message_id, group_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS message_analysis (
            id TEXT PRIMARY KEY,
            message_id TEXT NOT NULL UNIQUE REFERENCES messages(id) ON DELETE CASCADE,
            topic TEXT NOT NULL,
            sentiment TEXT NOT NULL,
            sentiment_score REAL NOT NULL,
            intent TEXT NOT NULL,
            keywords TEXT NOT NULL DEFAULT '[]',
            is_question INTEGER NOT NULL DEFAULT 0,
            analyzer TEXT NOT NULL,
            analyzed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS message_history (
            id TEXT PRIMARY KEY,
            message_id TEXT NOT NULL REFERENCES messages(id) ON DELETE CASCADE,
            old_text TEXT,
            new_text TEXT,
            edited_at TEXT NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_messages_group_source ON messages(group_id, created_at_source);
        CREATE INDEX IF NOT EXISTS idx_messages_created_at_source ON messages(created_at_source);
        CREATE INDEX IF NOT EXISTS idx_messages_author_id ON messages(author_id);
        CREATE INDEX IF NOT EXISTS idx_messages_ai_processed ON messages(ai_processed);
        CREATE INDEX IF NOT EXISTS idx_message_history_message_id ON message_history(message_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database tables created successfully");
    Ok(())
}
