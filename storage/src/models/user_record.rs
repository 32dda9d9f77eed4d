//! Chat user model. Maps to the `chat_users` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub external_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// First and last name joined; `User {external_id}` when both are empty.
    pub fn full_name(&self) -> String {
        full_name(
            self.external_id,
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }

    /// Full name, or the username when no name is known.
    pub fn display_name(&self) -> String {
        display_name(
            self.external_id,
            self.username.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

/// Latest display fields seen for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpsert {
    pub external_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_bot: bool,
}

pub(crate) fn full_name(external_id: i64, first: Option<&str>, last: Option<&str>) -> String {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        format!("User {}", external_id)
    } else {
        parts.join(" ")
    }
}

pub(crate) fn display_name(
    external_id: i64,
    username: Option<&str>,
    first: Option<&str>,
    last: Option<&str>,
) -> String {
    let has_name = [first, last]
        .into_iter()
        .flatten()
        .any(|p| !p.trim().is_empty());
    match username.filter(|u| !u.is_empty()) {
        Some(username) if !has_name => username.to_string(),
        _ => full_name(external_id, first, last),
    }
}
