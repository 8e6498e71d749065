//! Output ports
//!
//! Rendering responses into documents, writing them to a run directory,
//! and naming runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use panel_domain::{LlmResponse, PanelError};
use std::path::{Path, PathBuf};

/// A rendered response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File name within the run directory.
    pub file_name: String,
    pub content: String,
}

/// Turns one response into a document
pub trait ResponseRenderer: Send + Sync {
    fn render(&self, response: &LlmResponse, generated_at: DateTime<Utc>) -> RenderedDocument;
}

/// Persists rendered documents
#[async_trait]
pub trait OutputWriter: Send + Sync {
    /// Create (if needed) and return the directory for `run_name` under `base`.
    async fn prepare_run_dir(&self, base: &Path, run_name: &str) -> Result<PathBuf, PanelError>;

    /// Write one document into `dir`, returning its final path.
    async fn write(&self, dir: &Path, document: &RenderedDocument) -> Result<PathBuf, PanelError>;
}

/// Generates run identifiers
pub trait RunNamer: Send + Sync {
    fn name(&self, now: DateTime<Utc>) -> String;
}
