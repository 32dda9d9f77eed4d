//! Users: atomic find-or-create keyed on `external_id`.

use chrono::Utc;
use sqlx::SqliteExecutor;
use tracing::debug;
use uuid::Uuid;

use crate::models::{UserRecord, UserUpsert};
use crate::StorageError;

/// Creates the user or overwrites its display fields and bot flag with the latest values.
pub async fn upsert_user<'e, E>(executor: E, user: &UserUpsert) -> Result<UserRecord, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO chat_users (id, external_id, username, first_name, last_name, is_bot, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(external_id) DO UPDATE SET
            username = excluded.username,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            is_bot = excluded.is_bot,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user.external_id)
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.is_bot)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;

    debug!(external_id = user.external_id, id = %record.id, "upserted user");
    Ok(record)
}

pub async fn get_user<'e, E>(executor: E, id: &str) -> Result<Option<UserRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(
        sqlx::query_as::<_, UserRecord>("SELECT * FROM chat_users WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?,
    )
}

pub async fn find_user_by_external_id<'e, E>(
    executor: E,
    external_id: i64,
) -> Result<Option<UserRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(
        sqlx::query_as::<_, UserRecord>("SELECT * FROM chat_users WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(executor)
            .await?,
    )
}

pub async fn count_users<'e, E>(executor: E) -> Result<i64, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_users")
        .fetch_one(executor)
        .await?;
    Ok(count)
}
