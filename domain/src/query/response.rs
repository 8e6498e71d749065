//! Provider response value object

use crate::config::GroupInfo;
use crate::core::model::ModelSpec;
use crate::error::{ErrorCategory, PanelError};
use serde::{Deserialize, Serialize};

/// Free-form response metadata (token usage, stop reason, ...).
pub type ResponseMetadata = serde_json::Map<String, serde_json::Value>;

/// One model's answer, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub provider: String,
    pub model_id: String,
    /// Generated text; empty on failure.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    #[serde(default, skip_serializing_if = "ResponseMetadata::is_empty")]
    pub metadata: ResponseMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_info: Option<GroupInfo>,
}

impl LlmResponse {
    pub fn success(spec: &ModelSpec, text: impl Into<String>) -> Self {
        Self {
            provider: spec.provider.clone(),
            model_id: spec.model_id.clone(),
            text: text.into(),
            error: None,
            error_category: None,
            metadata: ResponseMetadata::new(),
            group_info: None,
        }
    }

    /// A response standing in for a failed query.
    pub fn failure(spec: &ModelSpec, error: &PanelError) -> Self {
        Self {
            error: Some(error.message.clone()),
            error_category: Some(error.category),
            ..Self::success(spec, "")
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_group_info(mut self, group: GroupInfo) -> Self {
        self.group_info = Some(group);
        self
    }

    pub fn key(&self) -> String {
        ModelSpec::new(&self.provider, &self.model_id).key()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_is_empty_text_with_category() {
        let spec = ModelSpec::new("openai", "gpt-4o");
        let response = LlmResponse::failure(&spec, &PanelError::api("openai", "rate limited"));
        assert_eq!(response.text, "");
        assert_eq!(response.error.as_deref(), Some("rate limited"));
        assert_eq!(response.error_category, Some(ErrorCategory::Api));
        assert!(!response.is_success());
        assert_eq!(response.key(), "openai:gpt-4o");
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let response = LlmResponse::success(&ModelSpec::new("a", "b"), "hi");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("metadata").is_none());
        assert_eq!(json["text"], "hi");
    }
}
