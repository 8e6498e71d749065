//! Model and group configuration from TOML (`[[models]]`, `[groups.<name>]`)

use super::super::error::ConfigLoadError;
use panel_domain::core::model::{MODEL_KEY_SEPARATOR, ModelOptions};
use panel_domain::{Group, ModelConfig};
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// One `[[models]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileModelConfig {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Tuning parameters passed through to the provider (temperature, ...).
    #[serde(default, skip_serializing_if = "ModelOptions::is_empty")]
    pub options: ModelOptions,
}

impl FileModelConfig {
    /// Validate and convert. `field` prefixes error messages, e.g.
    /// `models[2]` or `groups.coding.models[0]`.
    pub fn to_model_config(&self, field: &str) -> Result<ModelConfig, ConfigLoadError> {
        let provider = required(&self.provider, || format!("{}.provider", field))?;
        let model_id = required(&self.model_id, || format!("{}.model_id", field))?;
        if provider.contains(MODEL_KEY_SEPARATOR) {
            return Err(ConfigLoadError::InvalidValue {
                field: format!("{}.provider", field),
                value: provider.to_string(),
            });
        }

        let mut model = ModelConfig::new(provider, model_id).with_enabled(self.enabled);
        model.options = self.options.clone();
        if let Some(prompt) = self.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            model = model.with_system_prompt(prompt);
        }
        Ok(model)
    }
}

/// One `[groups.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileGroupConfig {
    /// Defaults to the table key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub models: Vec<FileModelConfig>,
}

impl FileGroupConfig {
    pub fn to_group(&self, key: &str) -> Result<Group, ConfigLoadError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(key);
        let prompt = self
            .system_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ConfigLoadError::MissingGroupPrompt(name.to_string()))?;

        let mut group = Group::new(name, prompt);
        for (i, model) in self.models.iter().enumerate() {
            group = group.with_model(model.to_model_config(&format!("groups.{}.models[{}]", key, i))?);
        }
        Ok(group)
    }
}

fn required(value: &str, field: impl FnOnce() -> String) -> Result<&str, ConfigLoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigLoadError::EmptyField { field: field() })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_conversion() {
        let file: FileModelConfig = toml::from_str(
            r#"
provider = "openai"
model_id = "gpt-4o"
enabled = false
[options]
temperature = 0.7
"#,
        )
        .unwrap();

        let model = file.to_model_config("models[0]").unwrap();
        assert_eq!(model.key(), "openai:gpt-4o");
        assert!(!model.enabled);
        assert_eq!(model.options["temperature"], 0.7);
        assert!(model.system_prompt.is_none());
    }

    #[test]
    fn test_empty_model_id_names_field() {
        let file: FileModelConfig = toml::from_str(r#"provider = "openai""#).unwrap();
        let err = file.to_model_config("models[3]").unwrap_err();
        assert_eq!(err.to_string(), "models[3].model_id must not be empty");
    }

    #[test]
    fn test_group_requires_prompt_and_defaults_name() {
        let group: FileGroupConfig = toml::from_str(
            r#"
[[models]]
provider = "anthropic"
model_id = "claude-3-7-sonnet-latest"
"#,
        )
        .unwrap();
        assert!(matches!(
            group.to_group("coding"),
            Err(ConfigLoadError::MissingGroupPrompt(name)) if name == "coding"
        ));

        let group = FileGroupConfig {
            system_prompt: Some("Be precise.".to_string()),
            ..group
        };
        let converted = group.to_group("coding").unwrap();
        assert_eq!(converted.name, "coding");
        assert_eq!(converted.models.len(), 1);
    }
}
