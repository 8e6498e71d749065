//! Configuration file loading for llm-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PANEL_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./panel.toml` or `./.panel.toml`
//! 4. Global: `$XDG_CONFIG_HOME/llm-panel/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigLoadError;
pub use file_config::{
    FileAnthropicConfig, FileConfig, FileDefaultsConfig, FileEndpointConfig, FileGroupConfig,
    FileModelConfig, FileProvidersConfig, ResolvedConfig,
};
pub use loader::ConfigLoader;
