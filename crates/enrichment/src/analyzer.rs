//! Message analysis capability with an AI-backed and a lexical variant.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use text_analysis::{Intent, Sentiment};

use crate::client::{AiEnrichmentClient, DEFAULT_MAX_TOPICS};

/// Topic recorded when none was found.
pub const GENERAL_TOPIC: &str = "general";

/// Everything the enrichment trigger stores for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInsight {
    pub sentiment: Sentiment,
    /// Fixed mapping of `sentiment`, see [`Sentiment::score`].
    pub sentiment_score: f64,
    pub intent: Intent,
    pub topics: Vec<String>,
    pub topic: String,
    pub keywords: Vec<String>,
    pub is_question: bool,
}

#[async_trait]
pub trait MessageAnalyzer: Send + Sync {
    /// Short label persisted alongside results, e.g. `ai` or `lexical`.
    fn name(&self) -> &'static str;

    async fn analyze(&self, text: &str) -> MessageInsight;
}

/// Sentiment, topics and intent from the AI client.
pub struct AiAnalyzer {
    client: Arc<AiEnrichmentClient>,
}

impl AiAnalyzer {
    pub fn new(client: Arc<AiEnrichmentClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageAnalyzer for AiAnalyzer {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn analyze(&self, text: &str) -> MessageInsight {
        let sentiment = self.client.classify_sentiment(text).await;
        let topics = self.client.extract_topics(text, DEFAULT_MAX_TOPICS).await;
        let intent = self.client.classify_intent(text).await;

        MessageInsight {
            sentiment,
            sentiment_score: sentiment.score(),
            intent,
            topic: topics
                .first()
                .cloned()
                .unwrap_or_else(|| GENERAL_TOPIC.to_string()),
            keywords: topics.clone(),
            topics,
            is_question: intent == Intent::Question,
        }
    }
}

/// Rule-based analysis; no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalAnalyzer;

#[async_trait]
impl MessageAnalyzer for LexicalAnalyzer {
    fn name(&self) -> &'static str {
        "lexical"
    }

    async fn analyze(&self, text: &str) -> MessageInsight {
        let lexical = text_analysis::analyze(text);
        let topics: Vec<String> = lexical.topic.iter().cloned().collect();
        MessageInsight {
            sentiment: lexical.sentiment,
            sentiment_score: lexical.sentiment.score(),
            intent: if lexical.is_question {
                Intent::Question
            } else {
                Intent::General
            },
            topic: lexical
                .topic
                .unwrap_or_else(|| GENERAL_TOPIC.to_string()),
            topics,
            keywords: lexical.keywords,
            is_question: lexical.is_question,
        }
    }
}

/// AI variant when the backend is configured, lexical otherwise.
pub fn select_analyzer(client: Arc<AiEnrichmentClient>) -> Arc<dyn MessageAnalyzer> {
    if client.is_available() {
        Arc::new(AiAnalyzer::new(client))
    } else {
        Arc::new(LexicalAnalyzer)
    }
}
