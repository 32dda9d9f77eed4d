//! Webhook ingestion: payload normalization and the transactional persistence pipeline.

mod event;
mod pipeline;

pub use event::{parse_timestamp, EventType, IngestEvent, WebhookPayload};
pub use pipeline::{ingest, IngestOutcome};
