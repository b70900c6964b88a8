//! Spam filter configuration from TOML (`[policy]` and `[classifier]` sections)

use relay_domain::classification::policy::{DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

/// Where the classification policy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySourceKind {
    /// Fetched per request from `model_url` and `prompt_url`.
    Remote,
    /// `model` and `system_prompt` from this file (or built-in defaults).
    #[default]
    Static,
}

/// Raw policy configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    pub source: PolicySourceKind,
    /// Plain-text document holding the model identifier.
    pub model_url: Option<String>,
    /// Plain-text document holding the system prompt.
    pub prompt_url: Option<String>,
    pub model: String,
    pub system_prompt: String,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        Self {
            source: PolicySourceKind::Static,
            model_url: None,
            prompt_url: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// OpenAI-compatible chat completion endpoint (Groq by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClassifierConfig {
    pub enabled: bool,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Environment variable for the API key (default: "GROQ_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead).
    pub api_key: Option<String>,
    pub max_tokens: u32,
}

impl Default for FileClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: None,
            max_tokens: 150,
        }
    }
}
