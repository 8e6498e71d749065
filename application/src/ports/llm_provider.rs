//! LLM provider port
//!
//! Defines the interface for sending one prompt to one provider, and the
//! registry that maps provider ids to implementations.

use async_trait::async_trait;
use panel_domain::core::model::ModelOptions;
use panel_domain::{ErrorCategory, LlmResponse, PanelError};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Errors a provider call can fail with
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider already classified the failure.
    #[error(transparent)]
    Classified(#[from] PanelError),

    /// Anything the provider could not classify.
    #[error("{0}")]
    Raw(Box<dyn StdError + Send + Sync + 'static>),
}

impl ProviderError {
    pub fn raw(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        ProviderError::Raw(err.into())
    }
}

impl From<ProviderError> for PanelError {
    /// Classified errors are kept as-is; raw ones become `Unknown`.
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Classified(e) => e,
            ProviderError::Raw(raw) => {
                PanelError::new(ErrorCategory::Unknown, raw.to_string()).with_boxed_cause(raw)
            }
        }
    }
}

/// A model provider (OpenAI, Anthropic, ...)
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` to `model_id` and return its answer.
    ///
    /// The returned response's `provider`/`model_id` may be left for the
    /// caller to fill in; the executor overwrites them.
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        options: &ModelOptions,
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse, ProviderError>;
}

/// Maps a provider id to its implementation
pub trait ProviderRegistry: Send + Sync {
    fn lookup(&self, provider_id: &str) -> Option<Arc<dyn LlmProvider>>;

    /// Registered provider ids, sorted.
    fn provider_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ProviderRegistry for BTreeMap<String, Arc<dyn LlmProvider>> {
    fn lookup(&self, provider_id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.get(provider_id).cloned()
    }

    fn provider_ids(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_error_passes_through() {
        let original = PanelError::api("openai", "401 Unauthorized").with_suggestion("check key");
        let converted: PanelError = ProviderError::from(original).into();
        assert_eq!(converted.category, ErrorCategory::Api);
        assert_eq!(converted.message, "401 Unauthorized");
        assert_eq!(converted.suggestions, vec!["check key"]);
    }

    #[test]
    fn test_raw_error_becomes_unknown() {
        let converted: PanelError = ProviderError::raw("socket hang up").into();
        assert_eq!(converted.category, ErrorCategory::Unknown);
        assert_eq!(converted.message, "socket hang up");
        assert_eq!(converted.cause_depth(), 1);
    }
}
