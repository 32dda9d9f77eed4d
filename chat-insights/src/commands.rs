//! Maintenance commands: sentiment backfill, enrichment reprocessing and file ingestion.

use std::path::Path;

use enrichment::{AiEnrichmentClient, BatchMessage, MessageAnalyzer, Sentiment, DEFAULT_BATCH_SIZE};
use serde::Serialize;
use serde_json::Value;
use storage::{message_repo, ChatStore};
use tracing::{info, instrument, warn};

use crate::components::AppComponents;
use crate::core::{InsightsError, Result};
use crate::enrichment_trigger::{enrich_message, EnrichmentOutcome};
use crate::webhook::handle_webhook;

pub const DEFAULT_BACKFILL_CHUNK: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub selected: usize,
    pub updated: usize,
}

/// Classifies messages that have text but no sentiment, newest first, `chunk_size` at a time.
/// Only the denormalized `sentiment` column is written.
///
/// Neutral labels are not stored: they are also what a failed or unavailable model yields,
/// and a stored label takes the message out of the next run.
#[instrument(skip(store, ai))]
pub async fn backfill_sentiment(
    store: &ChatStore,
    ai: &AiEnrichmentClient,
    chunk_size: usize,
    limit: Option<i64>,
) -> Result<BackfillReport> {
    let pending = message_repo::list_without_sentiment(store.pool(), limit).await?;
    let mut report = BackfillReport {
        selected: pending.len(),
        ..Default::default()
    };
    if pending.is_empty() {
        info!("backfill: nothing to analyze");
        return Ok(report);
    }
    if !ai.is_available() {
        warn!(selected = report.selected, "backfill: AI unavailable, leaving messages pending");
        return Ok(report);
    }

    for (index, chunk) in pending.chunks(chunk_size.max(1)).enumerate() {
        let batch: Vec<BatchMessage> = chunk
            .iter()
            .map(|m| BatchMessage::new(m.id.clone(), m.text.clone()))
            .collect();
        let classified = ai.classify_sentiment_batch(batch, DEFAULT_BATCH_SIZE).await;

        for item in classified {
            if let Some(sentiment) = item.sentiment.filter(|s| *s != Sentiment::Neutral) {
                message_repo::set_sentiment(store.pool(), &item.key, sentiment.as_str()).await?;
                report.updated += 1;
            }
        }
        info!(
            chunk = index + 1,
            updated = report.updated,
            selected = report.selected,
            "backfill: chunk done"
        );
    }
    Ok(report)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReprocessReport {
    pub selected: usize,
    pub analyzed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Re-runs enrichment for messages that are not processed, ignoring the revision guard.
#[instrument(skip(store, analyzer))]
pub async fn reprocess(
    store: &ChatStore,
    analyzer: &dyn MessageAnalyzer,
    limit: Option<i64>,
) -> Result<ReprocessReport> {
    let pending = message_repo::list_unprocessed(store.pool(), limit).await?;
    let mut report = ReprocessReport {
        selected: pending.len(),
        ..Default::default()
    };

    for message in &pending {
        match enrich_message(store, analyzer, &message.id, true).await? {
            EnrichmentOutcome::Analyzed(_) => report.analyzed += 1,
            EnrichmentOutcome::Skipped(_) => report.skipped += 1,
            EnrichmentOutcome::Failed(_) => report.failed += 1,
        }
    }
    info!(
        selected = report.selected,
        analyzed = report.analyzed,
        skipped = report.skipped,
        failed = report.failed,
        "reprocess: done"
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileIngestReport {
    pub events: usize,
    pub created: usize,
    pub updated: usize,
    pub rejected: usize,
}

/// Feeds a JSON file (one payload or an array of payloads) through the webhook handler.
/// Rejected payloads are logged and counted; storage errors abort.
#[instrument(skip(components))]
pub async fn ingest_file(components: &AppComponents, path: &Path) -> Result<FileIngestReport> {
    let content = tokio::fs::read_to_string(path).await?;
    let document: Value = serde_json::from_str(&content)
        .map_err(|e| InsightsError::InvalidPayload(format!("{}: {e}", path.display())))?;
    let payloads = match document {
        Value::Array(items) => items,
        single => vec![single],
    };

    let mut report = FileIngestReport::default();
    for (index, payload) in payloads.iter().enumerate() {
        report.events += 1;
        match handle_webhook(components, &payload.to_string()).await {
            Ok(response) if response.created => report.created += 1,
            Ok(_) => report.updated += 1,
            Err(InsightsError::InvalidPayload(reason)) => {
                warn!(index = index, error = %reason, "ingest file: payload rejected");
                report.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }
    info!(
        events = report.events,
        created = report.created,
        updated = report.updated,
        rejected = report.rejected,
        "ingest file: done"
    );
    Ok(report)
}
