//! OpenAI-compatible chat completions adapter (OpenAI, OpenRouter)

use super::http::{build_url, missing_api_key, post_json};
use crate::credentials::EnvCredentialStore;
use async_trait::async_trait;
use panel_application::{LlmProvider, ProviderError};
use panel_domain::core::model::ModelOptions;
use panel_domain::query::reasoning::THINKING_OPTION;
use panel_domain::{LlmResponse, ModelSpec, PanelError};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(flatten)]
    options: ModelOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Value>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider speaking the OpenAI chat completions protocol.
pub struct OpenAiCompatibleProvider {
    id: String,
    base_url: String,
    http: Client,
    credentials: Arc<EnvCredentialStore>,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        id: impl Into<String>,
        base_url: impl Into<String>,
        http: Client,
        credentials: Arc<EnvCredentialStore>,
    ) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            http,
            credentials,
        }
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, PanelError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
            PanelError::api(&self.id, "API key contains characters not allowed in a header")
                .with_cause(e)
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        options: &ModelOptions,
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse, ProviderError> {
        let api_key = self
            .credentials
            .api_key(&self.id)
            .ok_or_else(|| missing_api_key(&self.id))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let mut options = options.clone();
        options.remove(THINKING_OPTION);
        let request = ChatRequest {
            model: model_id,
            messages,
            options,
        };

        let url = build_url(&self.base_url, "chat/completions");
        debug!("POST {} (model {})", url, model_id);
        let response: ChatResponse =
            post_json(&self.http, &self.id, &url, self.headers(&api_key)?, &request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PanelError::api(&self.id, format!("{} returned no choices", self.id))
        })?;

        let spec = ModelSpec::new(&self.id, model_id);
        let mut result =
            LlmResponse::success(&spec, choice.message.content.unwrap_or_default());
        if let Some(reason) = choice.finish_reason {
            result = result.with_metadata("finish_reason", reason);
        }
        if let Some(usage) = response.usage {
            result = result.with_metadata("usage", usage);
        }
        if let Some(model) = response.model {
            result = result.with_metadata("model", model);
        }
        Ok(result)
    }
}
