//! Inputs, transcripts and deterministic fallback reports for narrative summaries.

use std::collections::HashSet;

use prompt::{truncate_chars, SentimentTally};
use serde::{Deserialize, Serialize};
use text_analysis::Sentiment;

pub const GROUP_SAMPLE_SIZE: usize = 50;
pub const GROUP_TRANSCRIPT_LINES: usize = 30;
pub const GROUP_PREVIEW_CHARS: usize = 100;

pub const WEEKLY_SAMPLE_SIZE: usize = 30;
pub const WEEKLY_TRANSCRIPT_LINES: usize = 20;
pub const WEEKLY_PREVIEW_CHARS: usize = 80;

/// Above this many messages activity is high.
pub const HIGH_ACTIVITY_THRESHOLD: usize = 100;
/// Above this many messages activity is medium.
pub const MEDIUM_ACTIVITY_THRESHOLD: usize = 50;
pub const DAYS_IN_WEEK: usize = 7;

pub const NO_DATA_REPORT: &str = "📊 Not enough messages to analyze yet.";

/// One message as seen by the summary generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMessage {
    pub author: String,
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Trailing-window aggregate fed to the weekly summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAggregate {
    pub total_messages: usize,
    pub group_count: usize,
    pub user_count: usize,
    /// Oldest first.
    pub messages: Vec<SummaryMessage>,
}

/// Counts sentiments; missing and `question` labels count as neutral.
pub fn tally_sentiments(messages: &[SummaryMessage]) -> SentimentTally {
    let mut tally = SentimentTally::default();
    for message in messages {
        match message.sentiment {
            Some(Sentiment::Positive) => tally.positive += 1,
            Some(Sentiment::Negative) => tally.negative += 1,
            _ => tally.neutral += 1,
        }
    }
    tally
}

/// `- author: text` lines for the most recent `sample` messages that carry text.
pub fn transcript(
    messages: &[SummaryMessage],
    sample: usize,
    max_lines: usize,
    preview_chars: usize,
) -> String {
    let start = messages.len().saturating_sub(sample);
    messages[start..]
        .iter()
        .filter_map(|m| {
            m.text
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| format!("- {}: {}", m.author, truncate_chars(t, preview_chars)))
        })
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

fn unique_authors(messages: &[SummaryMessage]) -> usize {
    messages
        .iter()
        .map(|m| m.author.as_str())
        .filter(|a| !a.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

fn activity_level(count: usize) -> &'static str {
    if count > HIGH_ACTIVITY_THRESHOLD {
        "🔥 High"
    } else if count > MEDIUM_ACTIVITY_THRESHOLD {
        "📊 Medium"
    } else {
        "📉 Low"
    }
}

/// Report built without the AI backend. Same input always yields the same text.
pub fn fallback_group_report(messages: &[SummaryMessage], group_name: &str) -> String {
    if messages.is_empty() {
        return NO_DATA_REPORT.to_string();
    }
    let total = messages.len();
    let tally = tally_sentiments(messages);
    let positive_percent = tally.positive as f64 / total as f64 * 100.0;
    let mood = if tally.positive > tally.negative {
        "😊 Positive atmosphere"
    } else {
        "😐 Neutral atmosphere"
    };

    format!(
        "📊 **{group_name} - Analysis**\n\n\
         ✅ **Overview:**\n\
         - Total messages: {total}\n\
         - Active users: {users}\n\
         - Positive messages: {positive} ({positive_percent:.1}%)\n\n\
         📈 **Activity:**\n\
         {activity} activity\n\n\
         💬 **Sentiment:**\n\
         {mood}\n",
        users = unique_authors(messages),
        positive = tally.positive,
        activity = activity_level(total),
    )
}

pub fn fallback_weekly_report(aggregate: &WeeklyAggregate) -> String {
    let count = aggregate.total_messages;
    if count == 0 {
        return NO_DATA_REPORT.to_string();
    }
    let avg_daily = count as f64 / DAYS_IN_WEEK as f64;

    format!(
        "📊 **Weekly Analysis**\n\n\
         ✅ **Key figures:**\n\
         - Total messages: {count}\n\
         - Active users: {users}\n\
         - Daily average: {avg_daily:.1} messages\n\n\
         📈 **Activity:** {activity}\n",
        users = aggregate.user_count,
        activity = activity_level(count),
    )
}
