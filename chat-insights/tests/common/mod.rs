//! Shared fixtures: temp-file stores, components and webhook payloads.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chat_insights::AppComponents;
use enrichment::{
    AiEnrichmentClient, Intent, LexicalAnalyzer, MessageAnalyzer, MessageInsight, Sentiment,
};
use llm_client::LlmClient;
use prompt::ChatMessage;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use storage::ChatStore;
use tempfile::TempDir;

/// Keeps the temp dir alive as long as the store is used.
pub struct TestEnv {
    pub _dir: TempDir,
    pub components: AppComponents,
}

impl TestEnv {
    pub fn store(&self) -> &ChatStore {
        &self.components.store
    }
}

pub async fn temp_store() -> (TempDir, ChatStore) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("insights.db");
    let store = ChatStore::connect(path.to_str().unwrap()).await.unwrap();
    (dir, store)
}

/// AI unavailable, lexical analyzer, enrichment awaited inside the webhook call.
pub async fn inline_env() -> TestEnv {
    env_with(Arc::new(AiEnrichmentClient::unavailable()), Arc::new(LexicalAnalyzer), true).await
}

pub async fn env_with(
    ai: Arc<AiEnrichmentClient>,
    analyzer: Arc<dyn MessageAnalyzer>,
    inline: bool,
) -> TestEnv {
    let (dir, store) = temp_store().await;
    let components = AppComponents::new(store, ai, inline).with_analyzer(analyzer);
    TestEnv {
        _dir: dir,
        components,
    }
}

pub fn new_message(message_id: i64, text: &str) -> Value {
    json!({
        "event_type": "new_message",
        "message_id": message_id,
        "group_id": 7,
        "group_name": "Payroll",
        "sender_id": 99,
        "sender_username": "aziz",
        "sender_first_name": "Aziz",
        "is_bot": false,
        "message_text": text,
        "media_type": "text",
        "telegram_created_at": "2024-01-01T00:00:00"
    })
}

pub fn edited_message(message_id: i64, text: &str) -> Value {
    let mut body = new_message(message_id, text);
    body["event_type"] = "edited_message".into();
    body["is_edited"] = true.into();
    body["telegram_edited_at"] = "2024-01-01T00:10:00".into();
    body
}

/// Always returns the same insight and counts calls.
pub struct FixedAnalyzer {
    pub calls: AtomicUsize,
}

impl FixedAnalyzer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageAnalyzer for FixedAnalyzer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn analyze(&self, _text: &str) -> MessageInsight {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MessageInsight {
            sentiment: Sentiment::Positive,
            sentiment_score: Sentiment::Positive.score(),
            intent: Intent::Feedback,
            topics: vec!["payroll".to_string()],
            topic: "payroll".to_string(),
            keywords: vec!["rahmat".to_string()],
            is_question: false,
        }
    }
}

/// Echoes the text as its only topic; texts containing "slow" take 400ms and read negative.
pub struct PacedAnalyzer;

#[async_trait]
impl MessageAnalyzer for PacedAnalyzer {
    fn name(&self) -> &'static str {
        "paced"
    }

    async fn analyze(&self, text: &str) -> MessageInsight {
        let slow = text.contains("slow");
        if slow {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        let sentiment = if slow { Sentiment::Negative } else { Sentiment::Positive };
        MessageInsight {
            sentiment,
            sentiment_score: sentiment.score(),
            intent: Intent::General,
            topics: vec![text.to_string()],
            topic: "general".to_string(),
            keywords: Vec::new(),
            is_question: false,
        }
    }
}

/// Bumps every message to a new revision while analyzing, like an edit arriving mid-run.
pub struct EditingAnalyzer {
    pub pool: SqlitePool,
}

#[async_trait]
impl MessageAnalyzer for EditingAnalyzer {
    fn name(&self) -> &'static str {
        "editing"
    }

    async fn analyze(&self, text: &str) -> MessageInsight {
        sqlx::query("UPDATE messages SET revision = revision + 1, text = 'edited meanwhile'")
            .execute(&self.pool)
            .await
            .unwrap();
        LexicalAnalyzer.analyze(text).await
    }
}

/// Drops the analysis table while analyzing, so storing the result fails.
pub struct TableDroppingAnalyzer {
    pub pool: SqlitePool,
}

#[async_trait]
impl MessageAnalyzer for TableDroppingAnalyzer {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn analyze(&self, _text: &str) -> MessageInsight {
        sqlx::query("DROP TABLE message_analysis")
            .execute(&self.pool)
            .await
            .unwrap();
        MessageInsight {
            sentiment: Sentiment::Neutral,
            sentiment_score: 0.0,
            intent: Intent::General,
            topics: Vec::new(),
            topic: "general".to_string(),
            keywords: Vec::new(),
            is_question: false,
        }
    }
}

/// Replies in order; errors once the script runs out.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn ok(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

pub fn scripted_client(llm: Arc<ScriptedLlm>) -> Arc<AiEnrichmentClient> {
    Arc::new(AiEnrichmentClient::new(llm).with_batch_delay(Duration::ZERO))
}
