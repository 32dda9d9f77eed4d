//! Narrative reports over stored messages: one group, or every group over the last week.

use chrono::{DateTime, Duration, Utc};
use enrichment::{AiEnrichmentClient, Sentiment, SummaryMessage, WeeklyAggregate};
use serde::Serialize;
use storage::{digest_repo, group_repo, ChatStore, MessageDigest, WindowCounts};
use tracing::{info, instrument};

use crate::core::{InsightsError, Result};

/// Most recent messages of a group fed to the group report.
pub const GROUP_MESSAGE_LIMIT: i64 = 200;
/// Messages of the trailing window fed to the weekly report.
pub const WEEKLY_MESSAGE_LIMIT: i64 = 100;
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct GroupInsights {
    pub group_id: i64,
    pub group_name: String,
    pub message_count: usize,
    pub report: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyInsights {
    pub since: DateTime<Utc>,
    pub counts: WindowCounts,
    pub report: String,
}

fn to_summary(digest: &MessageDigest) -> SummaryMessage {
    SummaryMessage {
        author: digest.author_name(),
        text: Some(digest.summary_text()),
        sentiment: digest.sentiment.as_deref().and_then(|s| s.parse::<Sentiment>().ok()),
    }
}

#[instrument(skip(store, ai))]
pub async fn group_insights(
    store: &ChatStore,
    ai: &AiEnrichmentClient,
    group_external_id: i64,
) -> Result<GroupInsights> {
    let group = group_repo::find_group_by_external_id(store.pool(), group_external_id)
        .await?
        .ok_or_else(|| InsightsError::NotFound(format!("Group {group_external_id} not found")))?;
    let digests = digest_repo::recent_in_group(store.pool(), &group.id, GROUP_MESSAGE_LIMIT).await?;
    let messages: Vec<SummaryMessage> = digests.iter().map(to_summary).collect();

    let report = ai.generate_group_summary(&messages, &group.title).await;
    info!(message_count = messages.len(), "group insights generated");

    Ok(GroupInsights {
        group_id: group.external_id,
        group_name: group.title,
        message_count: messages.len(),
        report,
    })
}

/// Weekly report for the window ending at `now`.
#[instrument(skip(store, ai))]
pub async fn weekly_insights(
    store: &ChatStore,
    ai: &AiEnrichmentClient,
    now: DateTime<Utc>,
) -> Result<WeeklyInsights> {
    let since = now - Duration::days(WEEKLY_WINDOW_DAYS);
    let counts = digest_repo::window_counts(store.pool(), since).await?;
    let digests = digest_repo::messages_since(store.pool(), since, WEEKLY_MESSAGE_LIMIT).await?;

    let aggregate = WeeklyAggregate {
        total_messages: counts.messages.max(0) as usize,
        group_count: counts.groups.max(0) as usize,
        user_count: counts.users.max(0) as usize,
        messages: digests.iter().map(to_summary).collect(),
    };
    let report = ai.generate_weekly_summary(&aggregate).await;
    info!(
        messages = counts.messages,
        groups = counts.groups,
        users = counts.users,
        "weekly insights generated"
    );

    Ok(WeeklyInsights {
        since,
        counts,
        report,
    })
}
