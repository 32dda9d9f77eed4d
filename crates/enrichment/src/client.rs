//! AI enrichment client. Every operation returns a structurally valid result; transport and
//! parse failures are logged and converted to the documented default at this boundary.

use std::sync::Arc;
use std::time::Duration;

use llm_client::{LlmClient, LlmConfig, OpenAILlmClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use text_analysis::{Intent, Sentiment, Urgency};
use tracing::{debug, info, instrument, warn};

use crate::response::clean_response;
use crate::summary::{
    fallback_group_report, fallback_weekly_report, tally_sentiments, transcript, SummaryMessage,
    WeeklyAggregate, GROUP_PREVIEW_CHARS, GROUP_SAMPLE_SIZE, GROUP_TRANSCRIPT_LINES,
    NO_DATA_REPORT, WEEKLY_PREVIEW_CHARS, WEEKLY_SAMPLE_SIZE, WEEKLY_TRANSCRIPT_LINES,
};

/// Texts shorter than this (after trimming) are not sent for sentiment or comprehensive analysis.
pub const MIN_TEXT_CHARS: usize = 3;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_TOPICS: usize = 3;
/// Topics of this many characters or fewer are discarded.
pub const MIN_TOPIC_CHARS: usize = 2;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Result of [`AiEnrichmentClient::analyze_comprehensive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub sentiment: Sentiment,
    pub intent: Intent,
    pub topics: Vec<String>,
    pub urgency: Urgency,
}

impl Default for ComprehensiveAnalysis {
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            intent: Intent::General,
            topics: Vec::new(),
            urgency: Urgency::Low,
        }
    }
}

/// Item of a batch sentiment run. `sentiment` is filled in by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMessage {
    pub key: String,
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl BatchMessage {
    pub fn new(key: impl Into<String>, text: Option<String>) -> Self {
        Self {
            key: key.into(),
            text,
            sentiment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub available: bool,
    pub api_key_configured: bool,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub ok: bool,
    pub model: Option<String>,
    pub error: Option<String>,
}

/// Client over an optional [`LlmClient`]; without one every operation returns defaults.
#[derive(Clone)]
pub struct AiEnrichmentClient {
    llm: Option<Arc<dyn LlmClient>>,
    api_key_configured: bool,
    batch_delay: Duration,
}

impl AiEnrichmentClient {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm: Some(llm),
            api_key_configured: true,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            llm: None,
            api_key_configured: false,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Available only when the config carries a credential.
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        match OpenAILlmClient::from_config(config) {
            Some(llm) => {
                info!(model = %config.model(), "AI enrichment configured");
                Self::new(Arc::new(llm))
            }
            None => {
                warn!("GEMINI_API_KEY not set; AI enrichment disabled");
                Self::unavailable()
            }
        }
    }

    /// Pause between consecutive batches of [`Self::classify_sentiment_batch`].
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_some()
    }

    pub fn api_status(&self) -> ApiStatus {
        ApiStatus {
            available: self.is_available(),
            api_key_configured: self.api_key_configured,
            model: self.llm.as_ref().map(|llm| llm.model().to_string()),
        }
    }

    /// Sends a one-word probe to the backend.
    pub async fn health_check(&self) -> HealthCheck {
        let Some(llm) = &self.llm else {
            return HealthCheck {
                ok: false,
                model: None,
                error: Some("AI backend not configured".to_string()),
            };
        };
        let model = Some(llm.model().to_string());
        match llm.complete_prompt(prompt::HEALTH_CHECK_PROMPT).await {
            Ok(reply) if !reply.trim().is_empty() => HealthCheck {
                ok: true,
                model,
                error: None,
            },
            Ok(_) => HealthCheck {
                ok: false,
                model,
                error: Some("empty response".to_string()),
            },
            Err(e) => HealthCheck {
                ok: false,
                model,
                error: Some(e.to_string()),
            },
        }
    }

    async fn ask(&self, operation: &'static str, prompt: &str) -> Option<String> {
        let llm = self.llm.as_ref()?;
        match llm.complete_prompt(prompt).await {
            Ok(reply) => {
                debug!(operation, reply_len = reply.len(), "AI reply");
                Some(reply)
            }
            Err(e) => {
                warn!(operation, error = %e, "AI request failed");
                None
            }
        }
    }

    #[instrument(skip(self, text))]
    pub async fn classify_sentiment(&self, text: &str) -> Sentiment {
        if !self.is_available() || text.trim().chars().count() < MIN_TEXT_CHARS {
            return Sentiment::Neutral;
        }
        match self
            .ask("sentiment", &prompt::sentiment_prompt(text))
            .await
        {
            Some(reply) => parse_sentiment_reply(&reply),
            None => Sentiment::Neutral,
        }
    }

    /// Labels every message, in input order, batching `batch_size` texts per request.
    pub async fn classify_sentiment_batch(
        &self,
        mut messages: Vec<BatchMessage>,
        batch_size: usize,
    ) -> Vec<BatchMessage> {
        if !self.is_available() {
            for message in &mut messages {
                message.sentiment = Some(Sentiment::Neutral);
            }
            return messages;
        }

        let batch_size = batch_size.max(1);
        let batch_count = messages.len().div_ceil(batch_size);
        for (idx, batch) in messages.chunks_mut(batch_size).enumerate() {
            self.process_batch(batch).await;
            if idx + 1 < batch_count && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }
        info!(
            messages = messages.len(),
            batches = batch_count,
            "sentiment batch complete"
        );
        messages
    }

    async fn process_batch(&self, batch: &mut [BatchMessage]) {
        let texts: Vec<&str> = batch
            .iter()
            .map(|m| m.text.as_deref().unwrap_or(""))
            .collect();
        if texts.iter().all(|t| t.trim().is_empty()) {
            set_all(batch, Sentiment::Neutral);
            return;
        }

        let Some(reply) = self
            .ask("sentiment_batch", &prompt::sentiment_batch_prompt(&texts))
            .await
        else {
            set_all(batch, Sentiment::Neutral);
            return;
        };

        match serde_json::from_str::<Vec<Value>>(clean_response(&reply)) {
            Ok(labels) => {
                if labels.len() < batch.len() {
                    debug!(
                        expected = batch.len(),
                        got = labels.len(),
                        "short batch reply; padding with neutral"
                    );
                }
                for (idx, message) in batch.iter_mut().enumerate() {
                    let label = labels
                        .get(idx)
                        .and_then(Value::as_str)
                        .and_then(|s| s.parse::<Sentiment>().ok())
                        .filter(|s| Sentiment::AI_LABELS.contains(s))
                        .unwrap_or(Sentiment::Neutral);
                    message.sentiment = Some(label);
                }
            }
            Err(e) => {
                warn!(error = %e, "batch reply is not a JSON array; analyzing individually");
                for message in batch.iter_mut() {
                    let text = message.text.clone().unwrap_or_default();
                    message.sentiment = Some(self.classify_sentiment(&text).await);
                }
            }
        }
    }

    #[instrument(skip(self, text))]
    pub async fn classify_intent(&self, text: &str) -> Intent {
        if !self.is_available() || text.trim().is_empty() {
            return Intent::General;
        }
        match self.ask("intent", &prompt::intent_prompt(text)).await {
            Some(reply) => parse_intent_reply(&reply),
            None => Intent::General,
        }
    }

    #[instrument(skip(self, text))]
    pub async fn extract_topics(&self, text: &str, max_topics: usize) -> Vec<String> {
        if !self.is_available() || text.trim().is_empty() {
            return Vec::new();
        }
        match self
            .ask("topics", &prompt::topics_prompt(text, max_topics))
            .await
        {
            Some(reply) => parse_topics_reply(&reply, max_topics),
            None => Vec::new(),
        }
    }

    /// One combined request; falls back to the three single-label calls when the reply
    /// is not a JSON object.
    #[instrument(skip(self, text))]
    pub async fn analyze_comprehensive(&self, text: &str) -> ComprehensiveAnalysis {
        if !self.is_available() || text.trim().chars().count() < MIN_TEXT_CHARS {
            return ComprehensiveAnalysis::default();
        }
        let Some(reply) = self
            .ask("comprehensive", &prompt::comprehensive_prompt(text))
            .await
        else {
            return ComprehensiveAnalysis::default();
        };

        match serde_json::from_str::<Value>(clean_response(&reply)) {
            Ok(Value::Object(fields)) => parse_comprehensive_fields(&fields),
            _ => {
                warn!("comprehensive reply is not a JSON object; using separate requests");
                ComprehensiveAnalysis {
                    sentiment: self.classify_sentiment(text).await,
                    intent: self.classify_intent(text).await,
                    topics: self.extract_topics(text, DEFAULT_MAX_TOPICS).await,
                    urgency: Urgency::Low,
                }
            }
        }
    }

    /// Narrative report for one group. `messages` must be ordered oldest first.
    pub async fn generate_group_summary(
        &self,
        messages: &[SummaryMessage],
        group_name: &str,
    ) -> String {
        if !self.is_available() || messages.is_empty() {
            return fallback_group_report(messages, group_name);
        }
        let lines = transcript(
            messages,
            GROUP_SAMPLE_SIZE,
            GROUP_TRANSCRIPT_LINES,
            GROUP_PREVIEW_CHARS,
        );
        let request = prompt::group_summary_prompt(
            group_name,
            messages.len(),
            tally_sentiments(messages),
            &lines,
        );
        match self.ask("group_summary", &request).await {
            Some(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            _ => fallback_group_report(messages, group_name),
        }
    }

    pub async fn generate_weekly_summary(&self, aggregate: &WeeklyAggregate) -> String {
        if aggregate.total_messages == 0 {
            return NO_DATA_REPORT.to_string();
        }
        if !self.is_available() {
            return fallback_weekly_report(aggregate);
        }
        let lines = transcript(
            &aggregate.messages,
            WEEKLY_SAMPLE_SIZE,
            WEEKLY_TRANSCRIPT_LINES,
            WEEKLY_PREVIEW_CHARS,
        );
        let request = prompt::weekly_summary_prompt(
            aggregate.total_messages,
            aggregate.group_count,
            aggregate.user_count,
            &lines,
        );
        match self.ask("weekly_summary", &request).await {
            Some(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            _ => fallback_weekly_report(aggregate),
        }
    }
}

fn set_all(batch: &mut [BatchMessage], sentiment: Sentiment) {
    for message in batch {
        message.sentiment = Some(sentiment);
    }
}

/// Substring match, positive before negative.
fn parse_sentiment_reply(reply: &str) -> Sentiment {
    let reply = reply.trim().to_lowercase();
    Sentiment::AI_LABELS
        .into_iter()
        .find(|label| reply.contains(label.as_str()))
        .unwrap_or(Sentiment::Neutral)
}

fn parse_intent_reply(reply: &str) -> Intent {
    let reply = reply.trim().to_lowercase();
    Intent::ALL
        .into_iter()
        .find(|intent| reply.contains(intent.as_str()))
        .unwrap_or(Intent::General)
}

fn parse_topics_reply(reply: &str, max_topics: usize) -> Vec<String> {
    reply
        .split(',')
        .map(str::trim)
        .filter(|t| t.chars().count() > MIN_TOPIC_CHARS)
        .take(max_topics)
        .map(str::to_string)
        .collect()
}

fn parse_comprehensive_fields(fields: &serde_json::Map<String, Value>) -> ComprehensiveAnalysis {
    let label = |key: &str| fields.get(key).and_then(Value::as_str);

    let sentiment = label("sentiment")
        .and_then(|s| s.parse::<Sentiment>().ok())
        .filter(|s| Sentiment::AI_LABELS.contains(s))
        .unwrap_or(Sentiment::Neutral);
    let intent = label("intent")
        .and_then(|s| s.parse().ok())
        .unwrap_or(Intent::General);
    let urgency = label("urgency")
        .and_then(|s| s.parse().ok())
        .unwrap_or(Urgency::Low);
    let topics = fields
        .get("topics")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(DEFAULT_MAX_TOPICS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    ComprehensiveAnalysis {
        sentiment,
        intent,
        topics,
        urgency,
    }
}
