//! # Chat insights
//!
//! Ingests group-chat events from a capture bot, keeps edit history, and enriches each saved
//! message with sentiment, intent and topics. Loads config from env and serves HTTP or runs
//! one maintenance command.
//!
//! Flow of one webhook call: [`ingest::IngestEvent`] (normalize) → [`ingest::ingest`]
//! (transactional upsert + history) → [`enrichment_trigger::enrich_message`] (after commit,
//! inline or spawned).

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod core;
pub mod enrichment_trigger;
pub mod ingest;
pub mod insights;
pub mod messages;
pub mod runner;
pub mod server;
pub mod webhook;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_components, AppComponents};
pub use config::InsightsConfig;
pub use crate::core::{init_tracing, InsightsError, Result};
pub use webhook::{handle_webhook, WebhookResponse};
