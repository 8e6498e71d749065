//! Ready-to-display errors for recurring situations.

use super::panel_error::PanelError;
use crate::config::AppConfig;
use crate::core::model::ModelConfig;
use crate::selection::api_key_env_var;
use std::path::Path;

const FALLBACK_EXAMPLE_KEYS: [&str; 2] = ["openai:gpt-4o", "anthropic:claude-3-7-sonnet-latest"];
const MAX_LISTED_MODELS: usize = 8;

/// A file the operator referenced does not exist.
pub fn file_not_found(path: &Path, cwd: &Path) -> PanelError {
    PanelError::filesystem(path, format!("File not found: {}", path.display())).with_suggestions([
        "Check that the path is spelled correctly".to_string(),
        format!(
            "Relative paths are resolved from the current working directory: {}",
            cwd.display()
        ),
        "Use an absolute path if the file lives elsewhere".to_string(),
    ])
}

/// A model key without the `provider:modelId` shape.
pub fn invalid_model_format(key: &str, config: Option<&AppConfig>) -> PanelError {
    let examples: Vec<String> = example_keys(config)
        .into_iter()
        .map(|k| format!("llm-panel prompt.md --model {}", k))
        .collect();

    PanelError::config(format!(
        "Invalid model format: \"{}\". Expected provider:modelId",
        key
    ))
    .with_suggestions([
        "Model keys use the format provider:modelId (for example \"openai:gpt-4o\")",
        "Separate the provider and the model id with exactly one ':'",
    ])
    .with_examples(examples)
}

/// A well-formed model key that no configured model matches.
pub fn model_not_found(key: &str, config: &AppConfig) -> PanelError {
    PanelError::config(format!("Model \"{}\" not found in configuration", key))
        .with_suggestions(available_models_suggestions(config))
}

/// A group name that is not configured.
pub fn group_not_found(name: &str, config: &AppConfig) -> PanelError {
    let names = config.group_names();
    let available = if names.is_empty() {
        "No groups are defined in the configuration".to_string()
    } else {
        format!("Available groups: {}", names.join(", "))
    };

    PanelError::config(format!("Group \"{}\" not found in configuration", name))
        .with_suggestion(available)
        .with_suggestion("Define groups under [groups.<name>] in the configuration file")
}

/// Every candidate model lacks a credential.
///
/// Aggregates all affected providers into one error; the message names
/// every affected model key.
pub fn missing_api_keys(models: &[ModelConfig]) -> PanelError {
    let keys: Vec<String> = models.iter().map(ModelConfig::key).collect();

    let mut providers: Vec<&str> = Vec::new();
    for model in models {
        if !providers.contains(&model.provider()) {
            providers.push(model.provider());
        }
    }

    let mut err = PanelError::new(
        super::ErrorCategory::Api,
        format!(
            "No models with valid API keys available. Missing API keys for: {}",
            keys.join(", ")
        ),
    )
    .with_suggestions(providers.iter().map(|p| {
        format!(
            "Set the {} environment variable to use provider \"{}\"",
            api_key_env_var(p),
            p
        )
    }))
    .with_suggestion("Make sure the variables are exported in the shell that runs llm-panel");

    if let [only] = providers.as_slice() {
        err = err.with_provider(*only);
    }
    err
}

fn example_keys(config: Option<&AppConfig>) -> Vec<String> {
    let from_config: Vec<String> = config
        .map(|c| c.model_keys().into_iter().take(2).collect())
        .unwrap_or_default();

    if from_config.is_empty() {
        FALLBACK_EXAMPLE_KEYS.iter().map(|k| k.to_string()).collect()
    } else {
        from_config
    }
}

fn available_models_suggestions(config: &AppConfig) -> Vec<String> {
    let keys = config.model_keys();
    if keys.is_empty() {
        return vec!["Add models under [[models]] in the configuration file".to_string()];
    }

    let mut listed: Vec<String> = keys.iter().take(MAX_LISTED_MODELS).cloned().collect();
    if keys.len() > MAX_LISTED_MODELS {
        listed.push(format!("... and {} more", keys.len() - MAX_LISTED_MODELS));
    }
    vec![
        format!("Available models: {}", listed.join(", ")),
        "Check the spelling of the provider and model id".to_string(),
    ]
}
