use serde::{Deserialize, Serialize};

/// Content kind of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MediaKind {
    Text,
    Photo,
    Video,
    Voice,
    Audio,
    Document,
    Sticker,
    Animation,
    VideoNote,
    Location,
    Contact,
    Poll,
    Emoji,
    #[serde(other)]
    Other,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Text => "text",
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Voice => "voice",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
            MediaKind::Sticker => "sticker",
            MediaKind::Animation => "animation",
            MediaKind::VideoNote => "video_note",
            MediaKind::Location => "location",
            MediaKind::Contact => "contact",
            MediaKind::Poll => "poll",
            MediaKind::Emoji => "emoji",
            MediaKind::Other => "other",
        }
    }
}

impl Default for MediaKind {
    fn default() -> Self {
        MediaKind::Text
    }
}
