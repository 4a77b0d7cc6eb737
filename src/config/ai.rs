//! AI interpreter configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Optional LLM interpreter configuration.
///
/// Disabled by default; when disabled the keyword interpreter handles every
/// utterance and none of the other fields are read.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Whether to route utterances through the LLM interpreter
    #[serde(default)]
    pub enabled: bool,

    /// API key for the chat-completion endpoint
    #[serde(default)]
    pub api_key: Option<Secret<String>>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.api_key.is_none() {
            return Err(ValidationError::MissingApiKey);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidAiTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
