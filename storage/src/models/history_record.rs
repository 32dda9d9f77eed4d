//! Edit history row. Append-only; maps to the `message_history` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: String,
    pub message_id: String,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    pub edited_at: DateTime<Utc>,
    /// Event type and source edit timestamp.
    pub metadata: Json<serde_json::Value>,
}
