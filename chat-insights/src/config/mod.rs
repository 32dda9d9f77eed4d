//! Service config: storage, logging, HTTP bind address, enrichment mode and the AI backend.
//! Loaded from env (call `dotenvy::dotenv()` first).

use std::env;
use std::time::Duration;

use anyhow::Result;
use llm_client::EnvLlmConfig;


pub const DEFAULT_DATABASE_URL: &str = "./chat_insights.db";
pub const DEFAULT_LOG_FILE: &str = "logs/chat-insights.log";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct InsightsConfig {
    /// DATABASE_URL: SQLite file path or `sqlite:` URL
    pub database_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// BIND_ADDR
    pub bind_addr: String,
    /// ENRICHMENT_INLINE: await enrichment inside the webhook call instead of spawning it
    pub enrichment_inline: bool,
    /// AI_BATCH_DELAY_MS: pause between sentiment batches
    pub batch_delay: Duration,
    /// GEMINI_API_KEY, AI_BASE_URL, AI_MODEL, AI_TEMPERATURE, AI_TOP_P
    pub llm: EnvLlmConfig,
}

impl InsightsConfig {
    /// Load from environment variables.
    pub fn load() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let enrichment_inline = env::var("ENRICHMENT_INLINE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let batch_delay_ms = env::var("AI_BATCH_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BATCH_DELAY_MS);

        Ok(Self {
            database_url,
            log_file,
            bind_addr,
            enrichment_inline,
            batch_delay: Duration::from_millis(batch_delay_ms),
            llm: EnvLlmConfig::from_env(),
        })
    }

    /// Validate config (bind address must parse as a socket address).
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("BIND_ADDR is not a valid socket address: {}", self.bind_addr);
        }
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
