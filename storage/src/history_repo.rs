//! Edit history. Rows are only ever inserted.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::models::HistoryRecord;
use crate::StorageError;

pub async fn insert_history<'e, E>(
    executor: E,
    message_id: &str,
    old_text: Option<&str>,
    new_text: Option<&str>,
    metadata: &serde_json::Value,
) -> Result<HistoryRecord, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, HistoryRecord>(
        r#"
        INSERT INTO message_history (id, message_id, old_text, new_text, edited_at, metadata)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(message_id)
    .bind(old_text)
    .bind(new_text)
    .bind(Utc::now())
    .bind(Json(metadata))
    .fetch_one(executor)
    .await?)
}

/// Newest edit first.
pub async fn list_history<'e, E>(
    executor: E,
    message_id: &str,
) -> Result<Vec<HistoryRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, HistoryRecord>(
        "SELECT * FROM message_history WHERE message_id = ? ORDER BY edited_at DESC, rowid DESC",
    )
    .bind(message_id)
    .fetch_all(executor)
    .await?)
}
