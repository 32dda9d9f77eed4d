//! CLI parser and config loading.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::DEFAULT_BACKFILL_CHUNK;
use crate::config::InsightsConfig;

#[derive(Parser)]
#[command(name = "chat-insights")]
#[command(about = "Group-chat ingestion and AI enrichment service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (webhook, message operations, insights).
    Serve {
        /// Overrides BIND_ADDR.
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Ingest webhook payloads from a JSON file (one object or an array).
    Ingest { file: PathBuf },
    /// Backfill sentiment for messages that have text but no sentiment yet.
    Analyze {
        #[arg(long, default_value_t = DEFAULT_BACKFILL_CHUNK)]
        batch_size: usize,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Re-run enrichment for messages that are not processed (including failed ones).
    Reprocess {
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Print a narrative report.
    Insights {
        #[command(subcommand)]
        scope: InsightsScope,
    },
    /// Show AI backend status and probe it.
    AiStatus,
}

#[derive(Subcommand)]
pub enum InsightsScope {
    /// One group, by its external id (supergroup ids are negative).
    Group {
        #[arg(allow_negative_numbers = true)]
        group_id: i64,
    },
    /// All groups over the last seven days.
    Weekly,
}

/// Load InsightsConfig from environment. `bind` overrides BIND_ADDR if provided.
pub fn load_config(bind: Option<String>) -> Result<InsightsConfig> {
    let mut config = InsightsConfig::load()?;
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    Ok(config)
}
