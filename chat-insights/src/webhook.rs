//! Webhook entry point: parse, ingest, then hand the saved message to enrichment.

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::components::AppComponents;
use crate::core::Result;
use crate::enrichment_trigger::{enrich_message, EnrichmentOutcome};
use crate::ingest::{ingest, EventType, IngestEvent, IngestOutcome};

/// Success body of the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub message_id: i64,
    pub created: bool,
    pub event_type: EventType,
    pub is_edited: bool,
}

impl From<&IngestOutcome> for WebhookResponse {
    fn from(outcome: &IngestOutcome) -> Self {
        Self {
            status: "success",
            message_id: outcome.external_message_id,
            created: outcome.created,
            event_type: outcome.event_type,
            is_edited: outcome.message.is_edited,
        }
    }
}

/// Handles one webhook body. Only malformed input and storage failures are errors;
/// enrichment runs after the commit and never changes the response.
#[instrument(skip(components, body))]
pub async fn handle_webhook(components: &AppComponents, body: &str) -> Result<WebhookResponse> {
    let event = IngestEvent::from_json(body).inspect_err(|e| {
        warn!(error = %e, "webhook: rejected payload");
    })?;
    let outcome = ingest(&components.store, &event).await?;
    let response = WebhookResponse::from(&outcome);

    if outcome.triggers_enrichment() {
        dispatch_enrichment(components, &outcome).await;
    }
    Ok(response)
}

/// Inline mode awaits the trigger; otherwise it runs on a spawned task.
async fn dispatch_enrichment(components: &AppComponents, outcome: &IngestOutcome) {
    let message_id = outcome.message.id.clone();
    if components.enrichment_inline {
        run_trigger(components, &message_id).await;
    } else {
        let components = components.clone();
        tokio::spawn(async move {
            run_trigger(&components, &message_id).await;
        });
    }
}

async fn run_trigger(components: &AppComponents, message_id: &str) {
    match enrich_message(
        &components.store,
        components.analyzer.as_ref(),
        message_id,
        false,
    )
    .await
    {
        Ok(EnrichmentOutcome::Failed(reason)) => {
            warn!(message_id = %message_id, error = %reason, "webhook: enrichment failed")
        }
        Ok(outcome) => info!(message_id = %message_id, outcome = ?outcome, "webhook: enrichment done"),
        Err(e) => error!(message_id = %message_id, error = %e, "webhook: enrichment not run"),
    }
}
