//! Binary for the chat-insights service.

use anyhow::Result;
use chat_insights::cli::InsightsScope;
use chat_insights::runner;
use chat_insights::{load_config, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => runner::run_server(load_config(bind)?).await,
        Commands::Ingest { file } => runner::run_ingest(load_config(None)?, &file).await,
        Commands::Analyze { batch_size, limit } => {
            runner::run_analyze(load_config(None)?, batch_size, limit).await
        }
        Commands::Reprocess { limit } => runner::run_reprocess(load_config(None)?, limit).await,
        Commands::Insights { scope } => match scope {
            InsightsScope::Group { group_id } => {
                runner::run_group_insights(load_config(None)?, group_id).await
            }
            InsightsScope::Weekly => runner::run_weekly_insights(load_config(None)?).await,
        },
        Commands::AiStatus => runner::run_ai_status(load_config(None)?).await,
    }
}
