//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types by
//! [`FileConfig::resolve`].

mod defaults;
mod models;
mod providers;

pub use defaults::FileDefaultsConfig;
pub use models::{FileGroupConfig, FileModelConfig};
pub use providers::{FileAnthropicConfig, FileEndpointConfig, FileProvidersConfig};

use super::error::ConfigLoadError;
use panel_application::RunDefaults;
use panel_domain::AppConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Timeout and output directory
    pub defaults: FileDefaultsConfig,
    /// Top-level models
    pub models: Vec<FileModelConfig>,
    /// Named groups, keyed by table name
    pub groups: BTreeMap<String, FileGroupConfig>,
    /// Provider endpoints
    pub providers: FileProvidersConfig,
}

/// Configuration after validation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub app: AppConfig,
    pub defaults: RunDefaults,
    pub providers: FileProvidersConfig,
}

impl FileConfig {
    /// Validate and convert into domain configuration. The first invalid
    /// entry aborts with an error naming its field.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigLoadError> {
        let models = self
            .models
            .iter()
            .enumerate()
            .map(|(i, m)| m.to_model_config(&format!("models[{}]", i)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut app = AppConfig::new(models);
        for (key, group) in &self.groups {
            app = app.with_group(group.to_group(key)?);
        }

        Ok(ResolvedConfig {
            app,
            defaults: self.defaults.to_run_defaults(),
            providers: self.providers.clone(),
        })
    }
}
