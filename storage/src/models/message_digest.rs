//! Compact message views for narrative summaries.

use serde::{Deserialize, Serialize};

use super::user_record::display_name;
use super::MediaKind;

/// A message joined with its author's display fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageDigest {
    pub author_external_id: i64,
    pub author_username: Option<String>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
    pub text: Option<String>,
    pub media_kind: MediaKind,
    pub sentiment: Option<String>,
}

impl MessageDigest {
    pub fn author_name(&self) -> String {
        display_name(
            self.author_external_id,
            self.author_username.as_deref(),
            self.author_first_name.as_deref(),
            self.author_last_name.as_deref(),
        )
    }

    /// Text, or `[media_kind]` for messages without text.
    pub fn summary_text(&self) -> String {
        match self.text.as_deref().filter(|t| !t.is_empty()) {
            Some(text) => text.to_string(),
            None => format!("[{}]", self.media_kind.as_str()),
        }
    }
}

/// Distinct counts over a time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCounts {
    pub messages: i64,
    pub groups: i64,
    pub users: i64,
}
