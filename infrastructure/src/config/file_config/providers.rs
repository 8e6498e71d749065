//! Provider endpoints from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// An OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEndpointConfig {
    /// Base URL including the API version path, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
}

impl FileEndpointConfig {
    fn at(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn openai() -> Self {
        Self::at("https://api.openai.com/v1")
    }

    pub fn openrouter() -> Self {
        Self::at("https://openrouter.ai/api/v1")
    }
}

/// Anthropic Messages API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    pub base_url: String,
    /// Sent as the `anthropic-version` header.
    pub api_version: String,
    /// Used when a model's options do not set `max_tokens`.
    pub max_tokens: u32,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 8192,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileEndpointConfig,
    pub openrouter: FileEndpointConfig,
    pub anthropic: FileAnthropicConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            openai: FileEndpointConfig::openai(),
            openrouter: FileEndpointConfig::openrouter(),
            anthropic: FileAnthropicConfig::default(),
        }
    }
}
