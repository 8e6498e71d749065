//! Run defaults from TOML (`[defaults]` section)

use panel_application::RunDefaults;
use panel_domain::config::defaults::{DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDefaultsConfig {
    /// Per-model timeout in milliseconds.
    pub timeout_ms: u64,
    /// Directory runs are written under.
    pub output_dir: PathBuf,
}

impl Default for FileDefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl FileDefaultsConfig {
    pub fn to_run_defaults(&self) -> RunDefaults {
        RunDefaults::default()
            .with_timeout_ms(self.timeout_ms)
            .with_output_dir(&self.output_dir)
    }
}
