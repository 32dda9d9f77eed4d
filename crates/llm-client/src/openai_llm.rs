//! LlmClient backed by openai-client; talks to any OpenAI-compatible endpoint.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::CompletionOptions;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient, LlmConfig};

/// LlmClient implementation over [`openai_client::OpenAIClient`].
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: super::DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.client = self.client.with_options(options);
        self
    }

    /// Builds a client from config; None when no credential is configured.
    pub fn from_config(config: &dyn LlmConfig) -> Option<Self> {
        let api_key = config.api_key()?.to_string();
        Some(
            Self::with_base_url(api_key, config.base_url().to_string())
                .with_model(config.model().to_string())
                .with_options(CompletionOptions {
                    temperature: config.temperature(),
                    top_p: config.top_p(),
                }),
        )
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client.chat_completion(&self.model, openai_messages).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
