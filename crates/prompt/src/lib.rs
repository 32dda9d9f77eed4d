//! # Prompt
//!
//! Chat message types and the prompt templates used to enrich group-chat messages.
//!
//! ## Templates
//!
//! - **Single-label**: sentiment and intent; the model answers with one word.
//! - **List**: topic extraction; the model answers with a comma-separated list.
//! - **JSON**: batch sentiment (array of labels) and comprehensive analysis (object).
//! - **Narrative**: group and weekly reports built from counts, tallies and a transcript.
//!
//! Message texts are truncated by characters (never bytes) before they are embedded.
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to an OpenAI-compatible chat completion API.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// System instruction for every analysis request.
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You analyse messages from workplace group chats. Follow the requested output format exactly.";

pub const SENTIMENT_MAX_CHARS: usize = 500;
pub const BATCH_LINE_MAX_CHARS: usize = 200;
pub const INTENT_MAX_CHARS: usize = 300;
pub const TOPICS_MAX_CHARS: usize = 500;
pub const COMPREHENSIVE_MAX_CHARS: usize = 500;

/// Returns at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn sentiment_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of this message and respond with ONLY ONE WORD: positive, negative, or neutral.\n\n\
         Message: \"{}\"\n\n\
         Response (one word only):",
        truncate_chars(text, SENTIMENT_MAX_CHARS)
    )
}

/// Numbered batch prompt; the answer must be a JSON array aligned with `texts`.
pub fn sentiment_batch_prompt<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = texts
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            format!(
                "{}. {}",
                idx + 1,
                truncate_chars(text.as_ref(), BATCH_LINE_MAX_CHARS)
            )
        })
        .collect();

    format!(
        "Analyze sentiment for each message below. Respond with ONLY a JSON array of sentiments.\n\n\
         Messages:\n{}\n\n\
         Respond with JSON array like: [\"positive\", \"neutral\", \"negative\", ...]\n\
         Only use: positive, negative, or neutral\n\
         JSON array only, no explanation:",
        lines.join("\n")
    )
}

pub fn intent_prompt(text: &str) -> String {
    format!(
        "Classify the intent of this message. Respond with ONLY ONE WORD:\n\n\
         Options: question, complaint, feedback, request, greeting, general\n\n\
         Message: \"{}\"\n\n\
         Intent (one word):",
        truncate_chars(text, INTENT_MAX_CHARS)
    )
}

pub fn topics_prompt(text: &str, max_topics: usize) -> String {
    format!(
        "Extract {max} main topics from this text. Respond with ONLY a comma-separated list.\n\n\
         Text: \"{text}\"\n\n\
         Topics (comma-separated, {max} max):",
        max = max_topics,
        text = truncate_chars(text, TOPICS_MAX_CHARS)
    )
}

pub fn comprehensive_prompt(text: &str) -> String {
    format!(
        "Analyze this message and respond with JSON:\n\n\
         Message: \"{}\"\n\n\
         Provide JSON with these fields:\n\
         - sentiment: \"positive\", \"negative\", or \"neutral\"\n\
         - intent: \"question\", \"complaint\", \"feedback\", \"request\", \"greeting\", or \"general\"\n\
         - topics: array of 1-3 main topics (strings)\n\
         - urgency: \"high\", \"medium\", or \"low\"\n\n\
         JSON only, no explanation:",
        truncate_chars(text, COMPREHENSIVE_MAX_CHARS)
    )
}

/// Sentiment counts embedded in narrative prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

pub fn group_summary_prompt(
    group_name: &str,
    total: usize,
    tally: SentimentTally,
    transcript: &str,
) -> String {
    format!(
        "Analyze these group chat messages and write a short report.\n\n\
         **Group:** {group}\n\
         **Total messages:** {total}\n\
         **Sentiment:** Positive: {pos}, Negative: {neg}, Neutral: {neu}\n\n\
         **Sample messages:**\n{transcript}\n\n\
         Answer in this format:\n\n\
         📊 **{group} - Analysis**\n\n\
         ✅ **Overview:**\n[2-3 key statistics]\n\n\
         💬 **Main topics:**\n[3-5 topics]\n\n\
         📈 **Trends and observations:**\n[2-3 notable trends]\n\n\
         ⚡ **Recommendations:**\n[1-2 practical recommendations]\n\n\
         Plain text only, no JSON!",
        group = group_name,
        total = total,
        pos = tally.positive,
        neg = tally.negative,
        neu = tally.neutral,
        transcript = transcript
    )
}

pub fn weekly_summary_prompt(
    message_count: usize,
    group_count: usize,
    user_count: usize,
    transcript: &str,
) -> String {
    format!(
        "Analyze the last week of group chat messages and write a short report.\n\n\
         **Statistics:**\n\
         - Total messages: {message_count}\n\
         - Groups: {group_count}\n\
         - Active users: {user_count}\n\n\
         **Messages:**\n{transcript}\n\n\
         Answer in this format:\n\n\
         📊 **Weekly Analysis**\n\n\
         ✅ **Key figures:**\n[2-3 key statistics]\n\n\
         💬 **Topics:**\n[3-4 main topics]\n\n\
         📈 **Trends:**\n[2-3 trends]\n\n\
         ⚡ **Recommendations:**\n[1-2 recommendations]\n\n\
         Plain text only!"
    )
}

/// One-word probe used by the AI health check.
pub const HEALTH_CHECK_PROMPT: &str = "Reply with the single word: ok";
