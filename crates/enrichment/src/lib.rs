//! # Enrichment
//!
//! AI enrichment of chat messages over an optional [`llm_client::LlmClient`].
//!
//! - [`AiEnrichmentClient`]: sentiment (single and batched), intent, topics, comprehensive
//!   analysis, group and weekly summaries. Never fails: unavailable backends, transport errors
//!   and malformed replies all resolve to documented defaults.
//! - [`MessageAnalyzer`]: one capability, two variants ([`AiAnalyzer`], [`LexicalAnalyzer`]),
//!   chosen by [`select_analyzer`].
//! - Summaries fall back to deterministic reports built from the same input.

mod analyzer;
mod client;
mod response;
mod summary;

pub use analyzer::{
    select_analyzer, AiAnalyzer, LexicalAnalyzer, MessageAnalyzer, MessageInsight, GENERAL_TOPIC,
};
pub use client::{
    AiEnrichmentClient, ApiStatus, BatchMessage, ComprehensiveAnalysis, HealthCheck,
    DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, DEFAULT_MAX_TOPICS, MIN_TEXT_CHARS,
};
pub use response::clean_response;
pub use summary::{
    fallback_group_report, fallback_weekly_report, tally_sentiments, transcript, SummaryMessage,
    WeeklyAggregate, HIGH_ACTIVITY_THRESHOLD, MEDIUM_ACTIVITY_THRESHOLD, NO_DATA_REPORT,
};
pub use text_analysis::{Intent, Sentiment, Urgency};
