//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible implementation. Transport-agnostic;
//! the enrichment crate depends only on the trait so tests can substitute scripted fakes.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole, DEFAULT_SYSTEM_MESSAGE};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use openai_llm::OpenAILlmClient;

/// LLM client interface: request a completion from a list of messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given messages (system/user/assistant).
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Model name used for requests; reported by status endpoints.
    fn model(&self) -> &str;

    /// Sends one user prompt after the default system instruction.
    async fn complete_prompt(&self, prompt: &str) -> Result<String> {
        self.complete(vec![
            ChatMessage::system(DEFAULT_SYSTEM_MESSAGE),
            ChatMessage::user(prompt),
        ])
        .await
    }
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    use openai_client::ChatCompletionRequestAssistantMessageArgs;
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
