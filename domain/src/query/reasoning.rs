//! Extended-reasoning ("thinking") support.

use crate::config::defaults::THINKING_BUDGET_TOKENS;
use crate::core::model::{ModelConfig, ModelOptions, ModelSpec};
use serde_json::json;

/// Option key carrying the reasoning budget.
pub const THINKING_OPTION: &str = "thinking";

const REASONING_MODEL_PREFIXES: &[&str] = &["claude-3-7", "claude-sonnet-4", "claude-opus-4"];

/// Whether the model accepts a reasoning budget.
pub fn supports_extended_reasoning(spec: &ModelSpec) -> bool {
    spec.provider == "anthropic"
        && REASONING_MODEL_PREFIXES
            .iter()
            .any(|prefix| spec.model_id.starts_with(prefix))
}

/// Options sent with one request: the model's configured options, plus
/// the reasoning budget when `enable_thinking` is set and the model
/// supports it. Otherwise any configured `thinking` entry is removed.
pub fn request_options(model: &ModelConfig, enable_thinking: bool) -> ModelOptions {
    let mut options = model.options.clone();
    if enable_thinking && supports_extended_reasoning(&model.spec) {
        options.insert(
            THINKING_OPTION.to_string(),
            json!({ "type": "enabled", "budget_tokens": THINKING_BUDGET_TOKENS }),
        );
    } else {
        options.remove(THINKING_OPTION);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_family() {
        assert!(supports_extended_reasoning(&ModelSpec::new("anthropic", "claude-3-7-sonnet-latest")));
        assert!(supports_extended_reasoning(&ModelSpec::new("anthropic", "claude-opus-4-1")));
        assert!(!supports_extended_reasoning(&ModelSpec::new("anthropic", "claude-3-5-haiku")));
        assert!(!supports_extended_reasoning(&ModelSpec::new("openrouter", "claude-3-7-sonnet")));
    }

    #[test]
    fn test_thinking_added_only_when_supported() {
        let model = ModelConfig::new("anthropic", "claude-sonnet-4-0").with_option("temperature", 0.2);
        let options = request_options(&model, true);
        assert_eq!(options["thinking"]["budget_tokens"], 16_000);
        assert_eq!(options["temperature"], 0.2);

        let other = ModelConfig::new("openai", "gpt-4o");
        assert!(!request_options(&other, true).contains_key(THINKING_OPTION));
    }

    #[test]
    fn test_thinking_omitted_when_disabled() {
        let model = ModelConfig::new("anthropic", "claude-3-7-sonnet-latest")
            .with_option("thinking", json!({"type": "enabled"}));
        assert!(!request_options(&model, false).contains_key(THINKING_OPTION));
    }
}
