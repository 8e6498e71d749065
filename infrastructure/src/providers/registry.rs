//! Static provider registry

use panel_application::{LlmProvider, ProviderRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Provider ids mapped to implementations, fixed for the lifetime of a run.
#[derive(Default, Clone)]
pub struct StaticProviderRegistry {
    providers: BTreeMap<String, Arc<dyn LlmProvider>>,
}

impl StaticProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, id: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(id.into(), provider);
        self
    }
}

impl ProviderRegistry for StaticProviderRegistry {
    fn lookup(&self, provider_id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(provider_id).cloned()
    }

    fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

#[cfg(feature = "http-providers")]
mod http_defaults {
    use super::StaticProviderRegistry;
    use crate::config::FileProvidersConfig;
    use crate::credentials::EnvCredentialStore;
    use crate::providers::anthropic::{self, AnthropicProvider};
    use crate::providers::openai::OpenAiCompatibleProvider;
    use reqwest::Client;
    use std::sync::Arc;

    impl StaticProviderRegistry {
        /// Registry with the built-in HTTP providers: `openai`,
        /// `openrouter` and `anthropic`. One HTTP client is shared.
        pub fn with_http_providers(
            settings: &FileProvidersConfig,
            credentials: Arc<EnvCredentialStore>,
        ) -> Self {
            let http = Client::new();
            Self::new()
                .with_provider(
                    "openai",
                    Arc::new(OpenAiCompatibleProvider::new(
                        "openai",
                        &settings.openai.base_url,
                        http.clone(),
                        Arc::clone(&credentials),
                    )),
                )
                .with_provider(
                    "openrouter",
                    Arc::new(OpenAiCompatibleProvider::new(
                        "openrouter",
                        &settings.openrouter.base_url,
                        http.clone(),
                        Arc::clone(&credentials),
                    )),
                )
                .with_provider(
                    anthropic::PROVIDER_ID,
                    Arc::new(AnthropicProvider::new(
                        settings.anthropic.clone(),
                        http,
                        credentials,
                    )),
                )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use panel_application::ProviderError;
    use panel_domain::core::model::ModelOptions;
    use panel_domain::{LlmResponse, ModelSpec};

    struct Canned;

    #[async_trait]
    impl LlmProvider for Canned {
        async fn generate(
            &self,
            _prompt: &str,
            model_id: &str,
            _options: &ModelOptions,
            _system_prompt: Option<&str>,
        ) -> Result<LlmResponse, ProviderError> {
            Ok(LlmResponse::success(&ModelSpec::new("canned", model_id), "ok"))
        }
    }

    #[test]
    fn test_lookup() {
        let registry = StaticProviderRegistry::new().with_provider("canned", Arc::new(Canned));
        assert!(registry.lookup("canned").is_some());
        assert!(registry.lookup("other").is_none());
        assert_eq!(registry.provider_ids(), vec!["canned"]);
    }

    #[cfg(feature = "http-providers")]
    #[test]
    fn test_http_providers_registered() {
        use crate::config::FileProvidersConfig;
        use crate::credentials::EnvCredentialStore;

        let registry = StaticProviderRegistry::with_http_providers(
            &FileProvidersConfig::default(),
            Arc::new(EnvCredentialStore::with_lookup(|_| None)),
        );
        assert_eq!(
            registry.provider_ids(),
            vec!["anthropic", "openai", "openrouter"]
        );
    }
}
