//! Scripted [`LlmClient`] fake shared by the enrichment integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use enrichment::AiEnrichmentClient;
use llm_client::LlmClient;
use prompt::ChatMessage;

/// Replies in order; errors once the script runs out. Records every user prompt.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<S, S>>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(Into::into).map_err(Into::into))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn ok(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok::<_, &str>(*r)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => Err(anyhow::anyhow!("script exhausted")),
        }
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

pub fn client_with(llm: Arc<ScriptedLlm>) -> AiEnrichmentClient {
    AiEnrichmentClient::new(llm).with_batch_delay(std::time::Duration::ZERO)
}
