//! Component factory: builds AppComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::Result;
use enrichment::{select_analyzer, AiEnrichmentClient, MessageAnalyzer};
use storage::ChatStore;
use tracing::{info, instrument};

use crate::config::InsightsConfig;

/// Shared handles for the webhook, HTTP handlers and CLI commands.
#[derive(Clone)]
pub struct AppComponents {
    pub store: ChatStore,
    pub ai: Arc<AiEnrichmentClient>,
    /// AI-backed when the client is available, lexical otherwise.
    pub analyzer: Arc<dyn MessageAnalyzer>,
    /// Await enrichment inside the webhook call instead of spawning it.
    pub enrichment_inline: bool,
}

impl AppComponents {
    pub fn new(store: ChatStore, ai: Arc<AiEnrichmentClient>, enrichment_inline: bool) -> Self {
        let analyzer = select_analyzer(ai.clone());
        Self {
            store,
            ai,
            analyzer,
            enrichment_inline,
        }
    }

    /// Replaces the analyzer chosen from the client's availability.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn MessageAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }
}

/// Opens the store and builds the AI client from config.
#[instrument(skip(config))]
pub async fn build_components(config: &InsightsConfig) -> Result<AppComponents> {
    let store = ChatStore::connect(&config.database_url).await?;
    let ai = AiEnrichmentClient::from_config(&config.llm).with_batch_delay(config.batch_delay);
    let components = AppComponents::new(store, Arc::new(ai), config.enrichment_inline);
    info!(
        analyzer = components.analyzer.name(),
        enrichment_inline = components.enrichment_inline,
        "Components ready"
    );
    Ok(components)
}
