//! Chat group model. Maps to the `chat_groups` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupRecord {
    pub id: String,
    pub external_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupUpsert {
    pub external_id: i64,
    /// None keeps the stored title.
    pub title: Option<String>,
}

impl GroupUpsert {
    pub(crate) fn initial_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Group {}", self.external_id))
    }
}
