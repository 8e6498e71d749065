//! Run defaults: values the CLI falls back to when a flag is absent.

use panel_domain::config::defaults::{DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Per-run defaults loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDefaults {
    /// Per-model request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Base directory runs are written under.
    pub output_dir: PathBuf,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl RunDefaults {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = RunDefaults::default();
        assert_eq!(defaults.timeout_ms, 120_000);
        assert_eq!(defaults.output_dir, PathBuf::from("panel-output"));
        assert_eq!(defaults.timeout(), Duration::from_secs(120));
    }
}
