//! Error categories

use serde::{Deserialize, Serialize};

/// The fixed set of failure categories every [`PanelError`](super::PanelError)
/// is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Invalid configuration, selection criteria or input
    Config,
    /// Provider API failures, including missing credentials
    Api,
    /// Missing files and other filesystem failures
    Filesystem,
    /// Access denied by the operating system
    Permission,
    /// Connectivity failures and timeouts
    Network,
    /// No classifying signal was found
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Api => "api",
            ErrorCategory::Filesystem => "filesystem",
            ErrorCategory::Permission => "permission",
            ErrorCategory::Network => "network",
            ErrorCategory::Unknown => "unknown",
        }
    }

    /// Human-readable label used in formatted error headers.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Config => "Configuration",
            ErrorCategory::Api => "API",
            ErrorCategory::Filesystem => "File System",
            ErrorCategory::Permission => "Permission",
            ErrorCategory::Network => "Network",
            ErrorCategory::Unknown => "Unknown",
        }
    }

    pub fn all() -> [ErrorCategory; 6] {
        [
            ErrorCategory::Config,
            ErrorCategory::Api,
            ErrorCategory::Filesystem,
            ErrorCategory::Permission,
            ErrorCategory::Network,
            ErrorCategory::Unknown,
        ]
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_lowercase_names() {
        for category in ErrorCategory::all() {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ErrorCategory::Config.label(), "Configuration");
        assert_eq!(ErrorCategory::Filesystem.label(), "File System");
    }
}
