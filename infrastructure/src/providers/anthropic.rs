//! Anthropic messages API adapter

use super::http::{build_url, missing_api_key, post_json};
use crate::config::FileAnthropicConfig;
use crate::credentials::EnvCredentialStore;
use async_trait::async_trait;
use panel_application::{LlmProvider, ProviderError};
use panel_domain::core::model::ModelOptions;
use panel_domain::query::reasoning::THINKING_OPTION;
use panel_domain::{LlmResponse, ModelSpec, PanelError};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const PROVIDER_ID: &str = "anthropic";

/// Room left for the visible answer on top of the reasoning budget.
const ANSWER_TOKENS_WITH_THINKING: u64 = 4096;

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
    #[serde(flatten)]
    options: ModelOptions,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    #[serde(other)]
    Other,
}

pub struct AnthropicProvider {
    settings: FileAnthropicConfig,
    http: Client,
    credentials: Arc<EnvCredentialStore>,
}

impl AnthropicProvider {
    pub fn new(
        settings: FileAnthropicConfig,
        http: Client,
        credentials: Arc<EnvCredentialStore>,
    ) -> Self {
        Self {
            settings,
            http,
            credentials,
        }
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, PanelError> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            PanelError::api(PROVIDER_ID, "Header value contains invalid characters").with_cause(e)
        };
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(invalid)?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_str(&self.settings.api_version).map_err(invalid)?,
        );
        Ok(headers)
    }

    /// Build the request body. With a reasoning budget the token limit
    /// must exceed the budget, and sampling overrides are not accepted.
    fn request<'a>(
        &self,
        prompt: &'a str,
        model_id: &'a str,
        options: &ModelOptions,
        system_prompt: Option<&'a str>,
    ) -> MessagesRequest<'a> {
        let mut options = options.clone();
        let mut max_tokens = options
            .remove("max_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(u64::from(self.settings.max_tokens));

        let budget = options
            .get(THINKING_OPTION)
            .and_then(|t| t.get("budget_tokens"))
            .and_then(Value::as_u64);
        if let Some(budget) = budget {
            max_tokens = max_tokens.max(budget + ANSWER_TOKENS_WITH_THINKING);
            options.remove("temperature");
            options.remove("top_k");
        }

        MessagesRequest {
            model: model_id,
            max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            options,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        options: &ModelOptions,
        system_prompt: Option<&str>,
    ) -> Result<LlmResponse, ProviderError> {
        let api_key = self
            .credentials
            .api_key(PROVIDER_ID)
            .ok_or_else(|| missing_api_key(PROVIDER_ID))?;

        let request = self.request(prompt, model_id, options, system_prompt);
        let url = build_url(&self.settings.base_url, "v1/messages");
        debug!(
            "POST {} (model {}, max_tokens {})",
            url, model_id, request.max_tokens
        );
        let response: MessagesResponse =
            post_json(&self.http, PROVIDER_ID, &url, self.headers(&api_key)?, &request).await?;

        let mut text = String::new();
        let mut thinking = String::new();
        for block in response.content {
            match block {
                ContentBlock::Text { text: t } => text.push_str(&t),
                ContentBlock::Thinking { thinking: t } => thinking.push_str(&t),
                ContentBlock::Other => {}
            }
        }

        let mut result = LlmResponse::success(&ModelSpec::new(PROVIDER_ID, model_id), text);
        if let Some(reason) = response.stop_reason {
            result = result.with_metadata("stop_reason", reason);
        }
        if let Some(usage) = response.usage {
            result = result.with_metadata("usage", usage);
        }
        if !thinking.is_empty() {
            result = result.with_metadata("thinking", thinking);
        }
        Ok(result)
    }
}
