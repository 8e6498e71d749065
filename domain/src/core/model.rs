//! Model identity and per-model configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator between provider and model id in a model key.
pub const MODEL_KEY_SEPARATOR: char = ':';

/// Open bag of tuning parameters passed through to a provider
/// (`temperature`, `max_tokens`, ...).
pub type ModelOptions = BTreeMap<String, serde_json::Value>;

/// Errors from parsing a `provider:modelId` model key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelKeyError {
    #[error("model key \"{0}\" is missing the ':' separator")]
    MissingSeparator(String),

    #[error("model key \"{0}\" contains more than one ':' separator")]
    TooManySeparators(String),

    #[error("model key \"{0}\" has an empty provider or model id")]
    EmptyPart(String),
}

/// Identity of one queryable model (Value Object).
///
/// The canonical external form is the model key `provider:modelId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelSpec {
    pub provider: String,
    pub model_id: String,
}

impl ModelSpec {
    pub fn new(provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model_id: model_id.into(),
        }
    }

    /// The `provider:modelId` key for this model.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.provider, MODEL_KEY_SEPARATOR, self.model_id)
    }

    /// Parse a model key. Exactly one separator is required.
    pub fn parse_key(key: &str) -> Result<Self, ModelKeyError> {
        let mut parts = key.split(MODEL_KEY_SEPARATOR);
        let (provider, model_id) = match (parts.next(), parts.next(), parts.next()) {
            (Some(provider), Some(model_id), None) => (provider.trim(), model_id.trim()),
            (_, None, _) => return Err(ModelKeyError::MissingSeparator(key.to_string())),
            _ => return Err(ModelKeyError::TooManySeparators(key.to_string())),
        };

        if provider.is_empty() || model_id.is_empty() {
            return Err(ModelKeyError::EmptyPart(key.to_string()));
        }

        Ok(Self::new(provider, model_id))
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.provider, MODEL_KEY_SEPARATOR, self.model_id)
    }
}

impl std::str::FromStr for ModelSpec {
    type Err = ModelKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_key(s)
    }
}

fn default_enabled() -> bool {
    true
}

/// A configured model: identity, eligibility and tuning options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub spec: ModelSpec,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub options: ModelOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl ModelConfig {
    pub fn new(provider: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::from_spec(ModelSpec::new(provider, model_id))
    }

    pub fn from_spec(spec: ModelSpec) -> Self {
        Self {
            spec,
            enabled: true,
            options: ModelOptions::new(),
            system_prompt: None,
        }
    }

    pub fn provider(&self) -> &str {
        &self.spec.provider
    }

    pub fn model_id(&self) -> &str {
        &self.spec.model_id
    }

    pub fn key(&self) -> String {
        self.spec.key()
    }

    // ==================== Builder Methods ====================

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn disabled(self) -> Self {
        self.with_enabled(false)
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}
