//! Configuration loading errors

use panel_domain::PanelError;
use panel_domain::error::factories;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating configuration files
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("{field} must not contain ':' (got \"{value}\")")]
    InvalidValue { field: String, value: String },

    #[error("Group \"{0}\" is missing a system_prompt")]
    MissingGroupPrompt(String),
}

impl From<ConfigLoadError> for PanelError {
    fn from(err: ConfigLoadError) -> Self {
        match err {
            ConfigLoadError::NotFound(path) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                factories::file_not_found(&path, &cwd)
            }
            ConfigLoadError::MissingGroupPrompt(name) => {
                PanelError::config(format!("Group \"{}\" is missing a system_prompt", name))
                    .with_suggestion("Every group needs a system_prompt")
                    .with_example(format!(
                        "[groups.{}]\nsystem_prompt = \"You are ...\"",
                        name
                    ))
            }
            other => PanelError::config(other.to_string())
                .with_suggestion("Check the configuration file against the documented format")
                .with_cause(other),
        }
    }
}
