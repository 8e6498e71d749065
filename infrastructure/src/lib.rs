//! Infrastructure layer for llm-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod context;
pub mod credentials;
mod io_error;
pub mod output;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, FileConfig, FileGroupConfig, FileModelConfig,
    FileProvidersConfig, ResolvedConfig,
};
pub use context::LocalContextLoader;
pub use credentials::EnvCredentialStore;
pub use output::{FileOutputWriter, TimestampRunNamer};
pub use providers::StaticProviderRegistry;
#[cfg(feature = "http-providers")]
pub use providers::{AnthropicProvider, OpenAiCompatibleProvider};
