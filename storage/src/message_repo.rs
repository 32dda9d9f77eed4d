//! Messages: idempotent upsert, lookups, deletion flags, enrichment bookkeeping and the
//! queries used by backfill and reprocessing.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{MessageRecord, MessageUpsert};
use crate::StorageError;

/// Inserts or updates the message for (external_message_id, group_id) in one statement.
///
/// Every write bumps `revision`; the returned row has `revision == 1` only when it was
/// inserted. `is_edited` never goes back to false.
pub async fn upsert_message<'e, E>(
    executor: E,
    message: &MessageUpsert,
) -> Result<MessageRecord, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    let record = sqlx::query_as::<_, MessageRecord>(
        r#"
        INSERT INTO messages (
            id, external_message_id, group_id, author_id, text, media_kind,
            media_file_id, media_file_unique_id, media_file_size, media_mime_type,
            media_file_path, media_file_name, reply_to_external_id, reply_to_id,
            forward_from_user_id, forward_from_chat_id, raw_json, is_edited,
            created_at_source, edited_at_source, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(external_message_id, group_id) DO UPDATE SET
            author_id = excluded.author_id,
            text = excluded.text,
            media_kind = excluded.media_kind,
            media_file_id = excluded.media_file_id,
            media_file_unique_id = excluded.media_file_unique_id,
            media_file_size = excluded.media_file_size,
            media_mime_type = excluded.media_mime_type,
            media_file_path = excluded.media_file_path,
            media_file_name = excluded.media_file_name,
            reply_to_external_id = excluded.reply_to_external_id,
            reply_to_id = excluded.reply_to_id,
            forward_from_user_id = excluded.forward_from_user_id,
            forward_from_chat_id = excluded.forward_from_chat_id,
            raw_json = excluded.raw_json,
            is_edited = MAX(messages.is_edited, excluded.is_edited),
            created_at_source = excluded.created_at_source,
            edited_at_source = COALESCE(excluded.edited_at_source, messages.edited_at_source),
            updated_at = excluded.updated_at,
            revision = messages.revision + 1
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(message.external_message_id)
    .bind(&message.group_id)
    .bind(&message.author_id)
    .bind(&message.text)
    .bind(message.media_kind)
    .bind(&message.media_file_id)
    .bind(&message.media_file_unique_id)
    .bind(message.media_file_size)
    .bind(&message.media_mime_type)
    .bind(&message.media_file_path)
    .bind(&message.media_file_name)
    .bind(message.reply_to_external_id)
    .bind(&message.reply_to_id)
    .bind(message.forward_from_user_id)
    .bind(message.forward_from_chat_id)
    .bind(&message.raw_json)
    .bind(message.is_edited)
    .bind(message.created_at_source)
    .bind(message.edited_at_source)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;

    debug!(
        id = %record.id,
        external_message_id = record.external_message_id,
        revision = record.revision,
        "upserted message"
    );
    Ok(record)
}

pub async fn get_message<'e, E>(executor: E, id: &str) -> Result<Option<MessageRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(
        sqlx::query_as::<_, MessageRecord>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?,
    )
}

/// Looks up a message by its external id within one group (local group id).
pub async fn find_message<'e, E>(
    executor: E,
    group_id: &str,
    external_message_id: i64,
) -> Result<Option<MessageRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, MessageRecord>(
        "SELECT * FROM messages WHERE group_id = ? AND external_message_id = ?",
    )
    .bind(group_id)
    .bind(external_message_id)
    .fetch_optional(executor)
    .await?)
}

/// Local id of a message in the group, if it was ever ingested.
pub async fn find_message_id<'e, E>(
    executor: E,
    group_id: &str,
    external_message_id: i64,
) -> Result<Option<String>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(String,)> =
        sqlx::query_as("SELECT id FROM messages WHERE group_id = ? AND external_message_id = ?")
            .bind(group_id)
            .bind(external_message_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(|(id,)| id))
}

/// Returns false when no such message exists.
pub async fn mark_deleted<'e, E>(
    executor: E,
    group_id: &str,
    external_message_id: i64,
) -> Result<bool, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE messages SET is_deleted = 1, updated_at = ? WHERE group_id = ? AND external_message_id = ?",
    )
    .bind(Utc::now())
    .bind(group_id)
    .bind(external_message_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Flags every listed message of the group as deleted; returns how many rows matched.
pub async fn bulk_mark_deleted<'e, E>(
    executor: E,
    group_id: &str,
    external_message_ids: &[i64],
) -> Result<u64, StorageError>
where
    E: SqliteExecutor<'e>,
{
    if external_message_ids.is_empty() {
        return Ok(0);
    }
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("UPDATE messages SET is_deleted = 1, updated_at = ");
    builder.push_bind(Utc::now());
    builder.push(" WHERE group_id = ");
    builder.push_bind(group_id);
    builder.push(" AND external_message_id IN (");
    {
        let mut ids = builder.separated(", ");
        for id in external_message_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }

    let result = builder.build().execute(executor).await?;
    info!(
        group_id = %group_id,
        requested = external_message_ids.len(),
        updated = result.rows_affected(),
        "bulk marked messages deleted"
    );
    Ok(result.rows_affected())
}

/// Writes the denormalized enrichment fields and clears any previous error.
///
/// Only applies while the row is still at `revision` and no newer revision has been
/// analyzed. Returns `false` when the analysis is stale and nothing was written.
pub async fn mark_ai_processed<'e, E>(
    executor: E,
    message_id: &str,
    sentiment: &str,
    topics: &[String],
    revision: i64,
) -> Result<bool, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET sentiment = ?, topics = ?, ai_processed = 1, ai_processed_at = ?,
            ai_error = NULL, ai_revision = ?
        WHERE id = ? AND revision = ? AND (ai_revision IS NULL OR ai_revision <= ?)
        "#,
    )
    .bind(sentiment)
    .bind(Json(topics))
    .bind(Utc::now())
    .bind(revision)
    .bind(message_id)
    .bind(revision)
    .bind(revision)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Records an enrichment failure; the rest of the row is left untouched.
pub async fn mark_ai_error<'e, E>(
    executor: E,
    message_id: &str,
    error: &str,
) -> Result<(), StorageError>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE messages SET ai_processed = 0, ai_error = ? WHERE id = ?")
        .bind(error)
        .bind(message_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Sets only the denormalized sentiment (batch backfill).
pub async fn set_sentiment<'e, E>(
    executor: E,
    message_id: &str,
    sentiment: &str,
) -> Result<(), StorageError>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE messages SET sentiment = ? WHERE id = ?")
        .bind(sentiment)
        .bind(message_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Messages with text and no (or an empty) sentiment yet, newest first. `None` means no limit.
pub async fn list_without_sentiment<'e, E>(
    executor: E,
    limit: Option<i64>,
) -> Result<Vec<MessageRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, MessageRecord>(
        r#"
        SELECT * FROM messages
        WHERE text IS NOT NULL AND text != '' AND (sentiment IS NULL OR sentiment = '')
        ORDER BY created_at_source DESC
        LIMIT ?
        "#,
    )
    .bind(limit.unwrap_or(-1))
    .fetch_all(executor)
    .await?)
}

/// Messages not (successfully) enriched, oldest first.
pub async fn list_unprocessed<'e, E>(
    executor: E,
    limit: Option<i64>,
) -> Result<Vec<MessageRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, MessageRecord>(
        "SELECT * FROM messages WHERE ai_processed = 0 ORDER BY created_at ASC LIMIT ?",
    )
    .bind(limit.unwrap_or(-1))
    .fetch_all(executor)
    .await?)
}

pub async fn count_messages<'e, E>(executor: E) -> Result<i64, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
        .fetch_one(executor)
        .await?;
    Ok(count)
}
