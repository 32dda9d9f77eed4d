//! LLM configuration: trait and env-based implementation.

use std::env;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    /// Credential; None means the AI backend is unavailable.
    fn api_key(&self) -> Option<&str>;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn top_p(&self) -> f32;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
    fn base_url(&self) -> &str {
        &self.base_url
    }
    fn model(&self) -> &str {
        &self.model
    }
    fn temperature(&self) -> f32 {
        self.temperature
    }
    fn top_p(&self) -> f32 {
        self.top_p
    }
}

impl Default for EnvLlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. A blank `GEMINI_API_KEY` counts as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let base_url = env::var("AI_BASE_URL").unwrap_or(defaults.base_url);
        let model = env::var("AI_MODEL").unwrap_or(defaults.model);
        let temperature = env::var("AI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.temperature);
        let top_p = env::var("AI_TOP_P")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.top_p);
        Self {
            api_key,
            base_url,
            model,
            temperature,
            top_p,
        }
    }
}
