//! Atomic file output writer

use crate::io_error::io_failure;
use async_trait::async_trait;
use panel_application::{OutputWriter, RenderedDocument};
use panel_domain::PanelError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each document to a temporary sibling, then renames it into
/// place, so readers never observe a partially written file.
#[derive(Debug, Clone, Default)]
pub struct FileOutputWriter;

impl FileOutputWriter {
    pub fn new() -> Self {
        Self
    }
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

#[async_trait]
impl OutputWriter for FileOutputWriter {
    async fn prepare_run_dir(&self, base: &Path, run_name: &str) -> Result<PathBuf, PanelError> {
        let dir = base.join(run_name);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_failure(&dir, "create directory", e, &cwd()))?;
        debug!("Prepared output directory {}", dir.display());
        Ok(dir)
    }

    async fn write(&self, dir: &Path, document: &RenderedDocument) -> Result<PathBuf, PanelError> {
        let target = dir.join(&document.file_name);
        let temp = dir.join(format!(".{}.tmp", document.file_name));

        tokio::fs::write(&temp, document.content.as_bytes())
            .await
            .map_err(|e| io_failure(&temp, "write", e, &cwd()))?;
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_failure(&target, "write", e, &cwd()));
        }

        debug!("Wrote {}", target.display());
        Ok(target)
    }
}
