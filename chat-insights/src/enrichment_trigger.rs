//! Post-save enrichment: analyzes a committed message and stores the result.
//!
//! Runs after ingestion has committed, so a failure here never touches the ingested row
//! beyond recording `ai_error`. Re-running is safe: the analysis row is replaced and the
//! message is only re-analyzed when its revision moved past the analyzed one.

use enrichment::{MessageAnalyzer, MessageInsight, MIN_TEXT_CHARS};
use storage::{
    analysis_repo, message_repo, user_repo, ChatStore, MessageRecord, NewAnalysis, StorageError,
};
use tracing::{debug, error, info, instrument};

use crate::core::{InsightsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Text absent or shorter than three characters after trimming.
    TextTooShort,
    BotAuthor,
    /// The current revision was already analyzed.
    AlreadyAnalyzed,
    /// The message was edited while the analysis ran; the newer revision gets its own run.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    Analyzed(MessageInsight),
    Skipped(SkipReason),
    /// Persisting the analysis failed; the error text is stored in `ai_error`.
    Failed(String),
}

/// Guard conditions, checked in order. `force` bypasses only the revision guard.
pub fn skip_reason(message: &MessageRecord, author_is_bot: bool, force: bool) -> Option<SkipReason> {
    let long_enough = message
        .text
        .as_deref()
        .map(|t| t.trim().chars().count() >= MIN_TEXT_CHARS)
        .unwrap_or(false);
    if !long_enough {
        return Some(SkipReason::TextTooShort);
    }
    if author_is_bot {
        return Some(SkipReason::BotAuthor);
    }
    if !force && message.is_analysis_current() {
        return Some(SkipReason::AlreadyAnalyzed);
    }
    None
}

/// Loads the latest state of the message, applies the guards, analyzes and persists.
///
/// `Err` only when the message or its author cannot be loaded.
#[instrument(skip(store, analyzer), fields(analyzer_name = analyzer.name()))]
pub async fn enrich_message(
    store: &ChatStore,
    analyzer: &dyn MessageAnalyzer,
    message_id: &str,
    force: bool,
) -> Result<EnrichmentOutcome> {
    let message = message_repo::get_message(store.pool(), message_id)
        .await?
        .ok_or_else(|| InsightsError::NotFound(format!("message {message_id}")))?;
    let author_is_bot = user_repo::get_user(store.pool(), &message.author_id)
        .await?
        .map(|u| u.is_bot)
        .unwrap_or(false);

    if let Some(reason) = skip_reason(&message, author_is_bot, force) {
        debug!(reason = ?reason, revision = message.revision, "enrichment: skipped");
        return Ok(EnrichmentOutcome::Skipped(reason));
    }

    let text = message.text.as_deref().unwrap_or_default();
    let insight = analyzer.analyze(text).await;

    match save_insight(store, &message, analyzer.name(), &insight).await {
        Ok(false) => {
            debug!(revision = message.revision, "enrichment: analysis superseded by a newer revision");
            Ok(EnrichmentOutcome::Skipped(SkipReason::Superseded))
        }
        Ok(true) => {
            info!(
                sentiment = insight.sentiment.as_str(),
                intent = insight.intent.as_str(),
                topics = ?insight.topics,
                revision = message.revision,
                "enrichment: message analyzed"
            );
            Ok(EnrichmentOutcome::Analyzed(insight))
        }
        Err(e) => {
            let reason = e.to_string();
            error!(error = %reason, "enrichment: failed to store analysis");
            if let Err(mark_err) = message_repo::mark_ai_error(store.pool(), &message.id, &reason).await
            {
                error!(error = %mark_err, "enrichment: failed to record ai_error");
            }
            Ok(EnrichmentOutcome::Failed(reason))
        }
    }
}

/// Analysis row and denormalized message fields in one transaction.
///
/// `Ok(false)` when the row moved past the analyzed revision; nothing is written then.
async fn save_insight(
    store: &ChatStore,
    message: &MessageRecord,
    analyzer_name: &str,
    insight: &MessageInsight,
) -> std::result::Result<bool, StorageError> {
    let mut tx = store.begin().await?;
    let current = message_repo::mark_ai_processed(
        &mut *tx,
        &message.id,
        insight.sentiment.as_str(),
        &insight.topics,
        message.revision,
    )
    .await?;
    if !current {
        tx.rollback().await?;
        return Ok(false);
    }
    analysis_repo::upsert_analysis(
        &mut *tx,
        &NewAnalysis {
            message_id: message.id.clone(),
            topic: insight.topic.clone(),
            sentiment: insight.sentiment.as_str().to_string(),
            sentiment_score: insight.sentiment_score,
            intent: insight.intent.as_str().to_string(),
            keywords: insight.keywords.clone(),
            is_question: insight.is_question,
            analyzer: analyzer_name.to_string(),
        },
    )
    .await?;
    tx.commit().await?;
    Ok(true)
}
