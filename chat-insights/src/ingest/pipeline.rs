//! One webhook event to committed rows: actors, reply target, pre-image, message, history.

use serde_json::json;
use storage::{
    group_repo, history_repo, message_repo, user_repo, ChatStore, MessageRecord, UserRecord,
};
use tracing::{debug, info, instrument};

use super::event::{EventType, IngestEvent};
use crate::core::Result;

/// What a committed ingestion produced.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub message: MessageRecord,
    pub author: UserRecord,
    pub external_message_id: i64,
    /// True only for the first write of this (external id, group).
    pub created: bool,
    pub event_type: EventType,
    pub is_edited: bool,
    /// A history row was written for this event.
    pub history_recorded: bool,
}

impl IngestOutcome {
    /// New messages and edits are enriched; plain re-deliveries are not.
    pub fn triggers_enrichment(&self) -> bool {
        self.created || self.is_edited
    }
}

/// Persists one event in a single transaction. Nothing is written when any step fails.
#[instrument(
    skip(store, event),
    fields(
        external_message_id = event.external_message_id,
        group_external_id = event.group.external_id,
        event_type = event.event_type.as_str()
    )
)]
pub async fn ingest(store: &ChatStore, event: &IngestEvent) -> Result<IngestOutcome> {
    let mut tx = store.begin().await?;

    let author = user_repo::upsert_user(&mut *tx, &event.sender).await?;
    let group = group_repo::upsert_group(&mut *tx, &event.group).await?;
    debug!(author_id = %author.id, group_id = %group.id, "ingest: actors resolved");

    let reply_to_id = match event.reply_to_external_id {
        Some(reply_external_id) => {
            let found =
                message_repo::find_message_id(&mut *tx, &group.id, reply_external_id).await?;
            if found.is_none() {
                debug!(
                    reply_to_external_id = reply_external_id,
                    "ingest: reply target not ingested yet, keeping raw id only"
                );
            }
            found
        }
        None => None,
    };

    let prior = if event.is_edited {
        message_repo::find_message(&mut *tx, &group.id, event.external_message_id).await?
    } else {
        None
    };

    let upsert = event.to_upsert(&group.id, &author.id, reply_to_id);
    let message = message_repo::upsert_message(&mut *tx, &upsert).await?;
    let created = message.is_new();

    let history_recorded = match &prior {
        Some(prior) => {
            let metadata = json!({
                "edited_at": event.edited_at.map(|ts| ts.to_rfc3339()),
                "event_type": event.event_type.as_str(),
            });
            history_repo::insert_history(
                &mut *tx,
                &message.id,
                prior.text.as_deref(),
                message.text.as_deref(),
                &metadata,
            )
            .await?;
            true
        }
        None => false,
    };

    tx.commit().await?;

    info!(
        message_id = %message.id,
        created = created,
        is_edited = event.is_edited,
        revision = message.revision,
        history_recorded = history_recorded,
        "ingest: message saved"
    );

    Ok(IngestOutcome {
        external_message_id: message.external_message_id,
        message,
        author,
        created,
        event_type: event.event_type,
        is_edited: event.is_edited,
        history_recorded,
    })
}
