//! Groups: atomic find-or-create keyed on `external_id`.

use chrono::Utc;
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::models::{GroupRecord, GroupUpsert};
use crate::StorageError;

/// Creates the group or updates its title. A missing title keeps the stored one.
pub async fn upsert_group<'e, E>(
    executor: E,
    group: &GroupUpsert,
) -> Result<GroupRecord, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    let record = sqlx::query_as::<_, GroupRecord>(
        r#"
        INSERT INTO chat_groups (id, external_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(external_id) DO UPDATE SET
            title = COALESCE(?, chat_groups.title),
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(group.external_id)
    .bind(group.initial_title())
    .bind(now)
    .bind(now)
    .bind(&group.title)
    .fetch_one(executor)
    .await?;

    debug!(external_id = group.external_id, id = %record.id, "upserted group");
    Ok(record)
}

pub async fn find_group_by_external_id<'e, E>(
    executor: E,
    external_id: i64,
) -> Result<Option<GroupRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(
        sqlx::query_as::<_, GroupRecord>("SELECT * FROM chat_groups WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(executor)
            .await?,
    )
}

pub async fn count_groups<'e, E>(executor: E) -> Result<i64, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_groups")
        .fetch_one(executor)
        .await?;
    Ok(count)
}
