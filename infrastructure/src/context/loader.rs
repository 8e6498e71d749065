//! Local file system context loader
//!
//! This module provides the [`LocalContextLoader`] implementation of
//! [`ContextLoaderPort`] that reads the instructions file and the context
//! documents of a run from the local file system.
//!
//! # Directory expansion
//!
//! A directory given as context expands to every file beneath it:
//!
//! - entries are visited in sorted order, so the combined prompt is stable
//! - hidden entries (names starting with `.`) are skipped, files and
//!   directories alike
//! - files that are not UTF-8 text are skipped with a warning
//!
//! A single file given explicitly is read the same way; if it is binary
//! it is skipped with a warning rather than failing the run.

use crate::io_error::io_failure;
use panel_application::ContextLoaderPort;
use panel_domain::{ContextDocument, PanelError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Context loader that reads from the local file system.
///
/// Relative paths are resolved against the working directory the loader
/// was created with; the same directory is named in file-not-found
/// suggestions.
#[derive(Debug, Clone)]
pub struct LocalContextLoader {
    working_dir: PathBuf,
}

impl Default for LocalContextLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalContextLoader {
    /// Creates a loader rooted at the process working directory.
    pub fn new() -> Self {
        Self::with_working_dir(std::env::current_dir().unwrap_or_default())
    }

    /// Creates a loader rooted at `dir`.
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: dir.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.working_dir.join(path)
    }

    fn read_text(&self, shown: &Path) -> Result<Option<String>, PanelError> {
        let bytes = fs::read(self.resolve(shown))
            .map_err(|e| io_failure(shown, "read", e, &self.working_dir))?;
        if bytes.contains(&0) {
            warn!("Skipping binary file {}", shown.display());
            return Ok(None);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(_) => {
                warn!("Skipping non-UTF-8 file {}", shown.display());
                Ok(None)
            }
        }
    }

    /// Collect files under `dir` (as shown to the user), depth first in
    /// name order.
    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PanelError> {
        let entries = fs::read_dir(self.resolve(dir))
            .map_err(|e| io_failure(dir, "list", e, &self.working_dir))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_failure(dir, "list", e, &self.working_dir))?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                debug!("Skipping hidden entry {}", dir.join(&name).display());
                continue;
            }
            let is_dir = entry
                .file_type()
                .map_err(|e| io_failure(&dir.join(&name), "inspect", e, &self.working_dir))?
                .is_dir();
            children.push((dir.join(name), is_dir));
        }
        children.sort();

        for (child, is_dir) in children {
            if is_dir {
                self.walk(&child, out)?;
            } else {
                out.push(child);
            }
        }
        Ok(())
    }
}

impl ContextLoaderPort for LocalContextLoader {
    fn load_instructions(&self, path: &Path) -> Result<String, PanelError> {
        match self.read_text(path)? {
            Some(text) => Ok(text),
            None => Err(PanelError::filesystem(
                path,
                format!("Instructions file is not UTF-8 text: {}", path.display()),
            )),
        }
    }

    fn load_context(&self, paths: &[PathBuf]) -> Result<Vec<ContextDocument>, PanelError> {
        let mut files = Vec::new();
        for path in paths {
            let metadata = fs::metadata(self.resolve(path))
                .map_err(|e| io_failure(path, "read", e, &self.working_dir))?;
            if metadata.is_dir() {
                self.walk(path, &mut files)?;
            } else {
                files.push(path.clone());
            }
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            if let Some(content) = self.read_text(&file)? {
                documents.push(ContextDocument::new(
                    file.to_string_lossy().replace('\\', "/"),
                    content,
                ));
            }
        }
        debug!("Loaded {} context document(s)", documents.len());
        Ok(documents)
    }
}
