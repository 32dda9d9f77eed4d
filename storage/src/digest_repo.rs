//! Read queries feeding the narrative summaries.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::models::{MessageDigest, WindowCounts};
use crate::StorageError;

const DIGEST_COLUMNS: &str = r#"
    u.external_id AS author_external_id,
    u.username AS author_username,
    u.first_name AS author_first_name,
    u.last_name AS author_last_name,
    m.text,
    m.media_kind,
    m.sentiment
"#;

/// The `limit` most recent messages of a group, returned oldest first.
pub async fn recent_in_group<'e, E>(
    executor: E,
    group_id: &str,
    limit: i64,
) -> Result<Vec<MessageDigest>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT {DIGEST_COLUMNS} FROM messages m JOIN chat_users u ON u.id = m.author_id \
         WHERE m.group_id = ? ORDER BY m.created_at_source DESC, m.rowid DESC LIMIT ?"
    );
    let mut rows = sqlx::query_as::<_, MessageDigest>(&sql)
        .bind(group_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;
    rows.reverse();
    Ok(rows)
}

/// Up to `limit` most recent messages sent at or after `since`, returned oldest first.
pub async fn messages_since<'e, E>(
    executor: E,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<MessageDigest>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT {DIGEST_COLUMNS} FROM messages m JOIN chat_users u ON u.id = m.author_id \
         WHERE m.created_at_source >= ? ORDER BY m.created_at_source DESC, m.rowid DESC LIMIT ?"
    );
    let mut rows = sqlx::query_as::<_, MessageDigest>(&sql)
        .bind(since)
        .bind(limit)
        .fetch_all(executor)
        .await?;
    rows.reverse();
    Ok(rows)
}

pub async fn window_counts<'e, E>(
    executor: E,
    since: DateTime<Utc>,
) -> Result<WindowCounts, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let (messages, groups, users): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(DISTINCT group_id), COUNT(DISTINCT author_id)
        FROM messages
        WHERE created_at_source >= ?
        "#,
    )
    .bind(since)
    .fetch_one(executor)
    .await?;
    Ok(WindowCounts {
        messages,
        groups,
        users,
    })
}
