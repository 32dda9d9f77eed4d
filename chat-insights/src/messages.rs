//! Operations on already-ingested messages, addressed by external ids.

use storage::{group_repo, history_repo, message_repo, ChatStore, HistoryRecord};
use tracing::info;

use crate::core::{InsightsError, Result};

fn message_not_found() -> InsightsError {
    InsightsError::NotFound("Message not found".to_string())
}

async fn local_message_id(
    store: &ChatStore,
    group_external_id: i64,
    external_message_id: i64,
) -> Result<Option<String>> {
    let Some(group) = group_repo::find_group_by_external_id(store.pool(), group_external_id).await?
    else {
        return Ok(None);
    };
    Ok(message_repo::find_message_id(store.pool(), &group.id, external_message_id).await?)
}

/// Edit history of one message, newest first.
pub async fn message_history(
    store: &ChatStore,
    group_external_id: i64,
    external_message_id: i64,
) -> Result<Vec<HistoryRecord>> {
    let id = local_message_id(store, group_external_id, external_message_id)
        .await?
        .ok_or_else(message_not_found)?;
    Ok(history_repo::list_history(store.pool(), &id).await?)
}

pub async fn mark_deleted(
    store: &ChatStore,
    group_external_id: i64,
    external_message_id: i64,
) -> Result<()> {
    let group = group_repo::find_group_by_external_id(store.pool(), group_external_id)
        .await?
        .ok_or_else(message_not_found)?;
    if !message_repo::mark_deleted(store.pool(), &group.id, external_message_id).await? {
        return Err(message_not_found());
    }
    info!(
        group_external_id = group_external_id,
        external_message_id = external_message_id,
        "message marked deleted"
    );
    Ok(())
}

/// Returns how many of the listed messages were flagged. An unknown group flags none.
pub async fn bulk_mark_deleted(
    store: &ChatStore,
    group_external_id: i64,
    external_message_ids: &[i64],
) -> Result<u64> {
    if external_message_ids.is_empty() {
        return Err(InsightsError::InvalidPayload(
            "No message IDs provided".to_string(),
        ));
    }
    match group_repo::find_group_by_external_id(store.pool(), group_external_id).await? {
        Some(group) => {
            Ok(message_repo::bulk_mark_deleted(store.pool(), &group.id, external_message_ids).await?)
        }
        None => Ok(0),
    }
}
