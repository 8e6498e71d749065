//! Context loader port
//!
//! Reads the instructions file and the context documents attached to a run.

use panel_domain::{ContextDocument, PanelError};
use std::path::{Path, PathBuf};

/// Reads run inputs from wherever they live (local disk in practice).
///
/// Errors are already classified: missing paths come back as
/// file-not-found errors, unreadable ones as permission errors.
pub trait ContextLoaderPort: Send + Sync {
    /// Read the instructions text.
    fn load_instructions(&self, path: &Path) -> Result<String, PanelError>;

    /// Read every context path; directories expand to their files.
    fn load_context(&self, paths: &[PathBuf]) -> Result<Vec<ContextDocument>, PanelError>;
}
