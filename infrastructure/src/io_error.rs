//! Classification of file system failures.

use panel_domain::PanelError;
use panel_domain::error::factories;
use std::io;
use std::path::Path;

/// Turn an I/O failure on `path` into a classified error. `action`
/// completes the sentence "Failed to ..." (e.g. "read", "write").
pub(crate) fn io_failure(path: &Path, action: &str, err: io::Error, cwd: &Path) -> PanelError {
    match err.kind() {
        io::ErrorKind::NotFound => factories::file_not_found(path, cwd).with_cause(err),
        io::ErrorKind::PermissionDenied => PanelError::permission(format!(
            "Permission denied: cannot {} {}",
            action,
            path.display()
        ))
        .with_file_path(path)
        .with_suggestion("Check the file permissions or run from a directory you can access")
        .with_cause(err),
        _ => PanelError::filesystem(
            path,
            format!("Failed to {} {}: {}", action, path.display(), err),
        )
        .with_cause(err),
    }
}
