//! Message model for persistence.
//!
//! Maps to the `messages` table. One row per (external_message_id, group_id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::MediaKind;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub external_message_id: i64,
    pub group_id: String,
    pub author_id: String,
    pub text: Option<String>,
    pub media_kind: MediaKind,
    pub media_file_id: Option<String>,
    pub media_file_unique_id: Option<String>,
    pub media_file_size: Option<i64>,
    pub media_mime_type: Option<String>,
    pub media_file_path: Option<String>,
    pub media_file_name: Option<String>,
    /// Raw reply id as received; kept even when the target is unknown.
    pub reply_to_external_id: Option<i64>,
    /// Resolved reply target, same group only.
    pub reply_to_id: Option<String>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub raw_json: String,
    pub is_deleted: bool,
    pub is_edited: bool,
    pub created_at_source: DateTime<Utc>,
    pub edited_at_source: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sentiment: Option<String>,
    pub topics: Json<Vec<String>>,
    pub ai_processed: bool,
    pub ai_processed_at: Option<DateTime<Utc>>,
    pub ai_error: Option<String>,
    /// 1 on insert, incremented by every ingestion write.
    pub revision: i64,
    /// Revision the stored analysis was computed from.
    pub ai_revision: Option<i64>,
}

impl MessageRecord {
    /// True when this row was inserted (not updated) by the write that returned it.
    pub fn is_new(&self) -> bool {
        self.revision == 1
    }

    pub fn has_media(&self) -> bool {
        self.media_kind != MediaKind::Text
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_external_id.is_some()
    }

    /// Already analysed at the current revision.
    pub fn is_analysis_current(&self) -> bool {
        self.ai_processed && self.ai_revision == Some(self.revision)
    }
}

/// Transport fields written by an ingestion event.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageUpsert {
    pub external_message_id: i64,
    pub group_id: String,
    pub author_id: String,
    pub text: Option<String>,
    pub media_kind: MediaKind,
    pub media_file_id: Option<String>,
    pub media_file_unique_id: Option<String>,
    pub media_file_size: Option<i64>,
    pub media_mime_type: Option<String>,
    pub media_file_path: Option<String>,
    pub media_file_name: Option<String>,
    pub reply_to_external_id: Option<i64>,
    pub reply_to_id: Option<String>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub raw_json: String,
    pub is_edited: bool,
    pub created_at_source: DateTime<Utc>,
    pub edited_at_source: Option<DateTime<Utc>>,
}

impl MessageUpsert {
    /// Text-only message with no media, reply or forward data.
    pub fn text(
        external_message_id: i64,
        group_id: impl Into<String>,
        author_id: impl Into<String>,
        text: Option<String>,
        created_at_source: DateTime<Utc>,
    ) -> Self {
        Self {
            external_message_id,
            group_id: group_id.into(),
            author_id: author_id.into(),
            text,
            media_kind: MediaKind::Text,
            media_file_id: None,
            media_file_unique_id: None,
            media_file_size: None,
            media_mime_type: None,
            media_file_path: None,
            media_file_name: None,
            reply_to_external_id: None,
            reply_to_id: None,
            forward_from_user_id: None,
            forward_from_chat_id: None,
            raw_json: "{}".to_string(),
            is_edited: false,
            created_at_source,
            edited_at_source: None,
        }
    }
}
