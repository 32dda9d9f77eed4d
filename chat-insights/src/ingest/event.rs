//! Webhook payload as sent by the capture bot, and its normalized form.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storage::{GroupUpsert, MediaKind, MessageUpsert, UserUpsert};

use crate::core::{InsightsError, Result};

/// Raw webhook body. Everything is optional here; [`IngestEvent::from_payload`] enforces
/// the required fields so the error names the missing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    pub event_type: Option<String>,
    #[serde(default)]
    pub is_edited: bool,
    pub message_id: Option<i64>,
    pub group_id: Option<i64>,
    pub group_name: Option<String>,
    pub sender_id: Option<i64>,
    pub sender_username: Option<String>,
    pub sender_first_name: Option<String>,
    pub sender_last_name: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    pub message_text: Option<String>,
    pub media_type: Option<MediaKind>,
    pub media_file_id: Option<String>,
    pub media_file_unique_id: Option<String>,
    pub media_file_size: Option<i64>,
    pub media_mime_type: Option<String>,
    pub media_file_path: Option<String>,
    pub media_file_name: Option<String>,
    pub reply_to_message_id: Option<i64>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub telegram_created_at: Option<String>,
    pub telegram_edited_at: Option<String>,
    /// Original platform update, either string-encoded JSON or inline JSON.
    pub raw_json: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    NewMessage,
    EditedMessage,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NewMessage => "new_message",
            EventType::EditedMessage => "edited_message",
        }
    }

    /// Missing means `new_message`.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("new_message") => Ok(EventType::NewMessage),
            Some("edited_message") => Ok(EventType::EditedMessage),
            Some(other) => Err(InsightsError::InvalidPayload(format!(
                "unknown event_type: {other}"
            ))),
        }
    }
}

/// A validated event, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct IngestEvent {
    pub event_type: EventType,
    /// Set by the payload flag or by an `edited_message` event.
    pub is_edited: bool,
    pub sender: UserUpsert,
    pub group: GroupUpsert,
    pub external_message_id: i64,
    pub text: Option<String>,
    pub media_kind: MediaKind,
    pub media_file_id: Option<String>,
    pub media_file_unique_id: Option<String>,
    pub media_file_size: Option<i64>,
    pub media_mime_type: Option<String>,
    pub media_file_path: Option<String>,
    pub media_file_name: Option<String>,
    pub reply_to_external_id: Option<i64>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub raw_json: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl IngestEvent {
    /// Parses a webhook body. Any problem is an [`InsightsError::InvalidPayload`].
    pub fn from_json(body: &str) -> Result<Self> {
        let payload: WebhookPayload = serde_json::from_str(body)
            .map_err(|e| InsightsError::InvalidPayload(format!("malformed JSON: {e}")))?;
        Self::from_payload(payload)
    }

    pub fn from_payload(payload: WebhookPayload) -> Result<Self> {
        let event_type = EventType::parse(payload.event_type.as_deref())?;
        let external_message_id = required(payload.message_id, "message_id")?;
        let group_id = required(payload.group_id, "group_id")?;
        let sender_id = required(payload.sender_id, "sender_id")?;
        let created_at = parse_timestamp(
            payload
                .telegram_created_at
                .as_deref()
                .ok_or_else(|| missing("telegram_created_at"))?,
        )?;
        let edited_at = payload
            .telegram_edited_at
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_timestamp)
            .transpose()?;

        Ok(Self {
            event_type,
            is_edited: payload.is_edited || event_type == EventType::EditedMessage,
            sender: UserUpsert {
                external_id: sender_id,
                username: payload.sender_username,
                first_name: payload.sender_first_name,
                last_name: payload.sender_last_name,
                is_bot: payload.is_bot,
            },
            group: GroupUpsert {
                external_id: group_id,
                title: payload.group_name.filter(|t| !t.trim().is_empty()),
            },
            external_message_id,
            text: payload.message_text,
            media_kind: payload.media_type.unwrap_or_default(),
            media_file_id: payload.media_file_id,
            media_file_unique_id: payload.media_file_unique_id,
            media_file_size: payload.media_file_size,
            media_mime_type: payload.media_mime_type,
            media_file_path: payload.media_file_path,
            media_file_name: payload.media_file_name,
            reply_to_external_id: payload.reply_to_message_id,
            forward_from_user_id: payload.forward_from_user_id,
            forward_from_chat_id: payload.forward_from_chat_id,
            raw_json: normalize_raw_json(payload.raw_json)?,
            created_at,
            edited_at,
        })
    }

    /// Message write for the resolved local group, author and reply target.
    pub fn to_upsert(
        &self,
        group_id: &str,
        author_id: &str,
        reply_to_id: Option<String>,
    ) -> MessageUpsert {
        MessageUpsert {
            external_message_id: self.external_message_id,
            group_id: group_id.to_string(),
            author_id: author_id.to_string(),
            text: self.text.clone(),
            media_kind: self.media_kind,
            media_file_id: self.media_file_id.clone(),
            media_file_unique_id: self.media_file_unique_id.clone(),
            media_file_size: self.media_file_size,
            media_mime_type: self.media_mime_type.clone(),
            media_file_path: self.media_file_path.clone(),
            media_file_name: self.media_file_name.clone(),
            reply_to_external_id: self.reply_to_external_id,
            reply_to_id,
            forward_from_user_id: self.forward_from_user_id,
            forward_from_chat_id: self.forward_from_chat_id,
            raw_json: self.raw_json.clone(),
            is_edited: self.is_edited,
            created_at_source: self.created_at,
            edited_at_source: self.edited_at,
        }
    }
}

fn missing(field: &str) -> InsightsError {
    InsightsError::InvalidPayload(format!("{field} is required"))
}

fn required(value: Option<i64>, field: &str) -> Result<i64> {
    value.ok_or_else(|| missing(field))
}

/// ISO-8601 with offset, or a naive date-time taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| InsightsError::InvalidPayload(format!("invalid timestamp: {value}")))
}

fn normalize_raw_json(raw: Option<Value>) -> Result<String> {
    match raw {
        None | Some(Value::Null) => Ok("{}".to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok("{}".to_string()),
        Some(Value::String(s)) => {
            let parsed: Value = serde_json::from_str(&s)
                .map_err(|e| InsightsError::InvalidPayload(format!("raw_json is not JSON: {e}")))?;
            Ok(parsed.to_string())
        }
        Some(other) => Ok(other.to_string()),
    }
}
