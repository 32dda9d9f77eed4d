//! Command runners: init logging, validate config, build components, then run one command.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, instrument};

use crate::commands::{backfill_sentiment, ingest_file, reprocess};
use crate::components::{build_components, AppComponents};
use crate::config::InsightsConfig;
use crate::core::init_tracing;
use crate::insights::{group_insights, weekly_insights};
use crate::server;

/// Shared startup for every command.
pub async fn prepare(config: &InsightsConfig) -> Result<AppComponents> {
    config.validate()?;
    init_tracing(&config.log_file)?;
    info!(database_url = %config.database_url, "Initializing chat-insights");
    build_components(config).await
}

#[instrument(skip(config))]
pub async fn run_server(config: InsightsConfig) -> Result<()> {
    let components = prepare(&config).await?;
    info!(
        ai_available = components.ai.is_available(),
        "Server starting"
    );
    server::serve(components, &config.bind_addr).await
}

pub async fn run_ingest(config: InsightsConfig, file: &Path) -> Result<()> {
    let mut components = prepare(&config).await?;
    // spawned tasks would be dropped when the command exits
    components.enrichment_inline = true;
    let report = ingest_file(&components, file).await?;
    println!(
        "Ingested {} events: {} created, {} updated, {} rejected",
        report.events, report.created, report.updated, report.rejected
    );
    Ok(())
}

pub async fn run_analyze(config: InsightsConfig, batch_size: usize, limit: Option<i64>) -> Result<()> {
    let components = prepare(&config).await?;
    if !components.ai.is_available() {
        println!("AI backend unavailable: sentiments will default to neutral");
    }
    let report = backfill_sentiment(&components.store, &components.ai, batch_size, limit).await?;
    println!(
        "Analyzed {} of {} messages",
        report.updated, report.selected
    );
    Ok(())
}

pub async fn run_reprocess(config: InsightsConfig, limit: Option<i64>) -> Result<()> {
    let components = prepare(&config).await?;
    let report = reprocess(&components.store, components.analyzer.as_ref(), limit).await?;
    println!(
        "Reprocessed {} messages: {} analyzed, {} skipped, {} failed",
        report.selected, report.analyzed, report.skipped, report.failed
    );
    Ok(())
}

pub async fn run_group_insights(config: InsightsConfig, group_id: i64) -> Result<()> {
    let components = prepare(&config).await?;
    let insights = group_insights(&components.store, &components.ai, group_id).await?;
    println!("{}", insights.report);
    Ok(())
}

pub async fn run_weekly_insights(config: InsightsConfig) -> Result<()> {
    let components = prepare(&config).await?;
    let insights = weekly_insights(&components.store, &components.ai, Utc::now()).await?;
    println!("{}", insights.report);
    Ok(())
}

pub async fn run_ai_status(config: InsightsConfig) -> Result<()> {
    let components = prepare(&config).await?;
    let status = components.ai.api_status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    let health = components.ai.health_check().await;
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}
