//! Classification of raw errors into [`PanelError`]s.
//!
//! A raw error crossing a module boundary is wrapped exactly once. An error
//! that is already a `PanelError` is returned unchanged so its cause chain
//! stays intact.

use super::category::ErrorCategory;
use super::panel_error::PanelError;
use std::error::Error as StdError;
use std::io::ErrorKind;
use std::sync::Arc;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classify any error into a [`PanelError`].
///
/// Accepts anything convertible into a boxed error, including plain
/// `String`s. Already-classified errors pass through untouched.
pub fn classify<E>(err: E) -> PanelError
where
    E: Into<BoxError>,
{
    match err.into().downcast::<PanelError>() {
        Ok(classified) => *classified,
        Err(raw) => {
            let category = category_for(&*raw);
            PanelError::new(category, raw.to_string()).with_shared_cause(Arc::from(raw))
        }
    }
}

/// Classify a raw error, replacing the message with `context` when the
/// error was not already classified.
pub fn classify_with_context<E>(err: E, context: impl Into<String>) -> PanelError
where
    E: Into<BoxError>,
{
    match err.into().downcast::<PanelError>() {
        Ok(classified) => *classified,
        Err(raw) => {
            let category = category_for(&*raw);
            PanelError::new(category, format!("{}: {}", context.into(), raw))
                .with_shared_cause(Arc::from(raw))
        }
    }
}

/// Determine the category for a raw error from inspectable signals.
///
/// I/O error kinds anywhere in the chain win over message heuristics.
pub fn category_for(err: &(dyn StdError + 'static)) -> ErrorCategory {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(classified) = e.downcast_ref::<PanelError>() {
            return classified.category;
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if let Some(category) = category_for_io_kind(io.kind()) {
                return category;
            }
        }
        current = e.source();
    }
    category_for_message(&err.to_string())
}

fn category_for_io_kind(kind: ErrorKind) -> Option<ErrorCategory> {
    match kind {
        ErrorKind::NotFound | ErrorKind::AlreadyExists | ErrorKind::IsADirectory => {
            Some(ErrorCategory::Filesystem)
        }
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
            Some(ErrorCategory::Permission)
        }
        ErrorKind::ConnectionRefused
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::NotConnected
        | ErrorKind::HostUnreachable
        | ErrorKind::NetworkUnreachable
        | ErrorKind::TimedOut => Some(ErrorCategory::Network),
        _ => None,
    }
}

const PERMISSION_SIGNALS: &[&str] = &["permission denied", "eacces", "eperm", "access denied"];
const NETWORK_SIGNALS: &[&str] = &[
    "econnrefused",
    "econnreset",
    "enotfound",
    "etimedout",
    "network",
    "connection",
    "timed out",
    "timeout",
    "dns",
];
const API_SIGNALS: &[&str] = &[
    "api key",
    "api_key",
    "unauthorized",
    "forbidden",
    "rate limit",
    "quota",
    "status 401",
    "status 403",
    "status 429",
];
const CONFIG_SIGNALS: &[&str] = &[
    "not found in configuration",
    "invalid model",
    "configuration",
    "config",
    "toml",
];
const FILESYSTEM_SIGNALS: &[&str] = &["enoent", "no such file", "not found", "directory"];

/// Message heuristics, checked from most to least specific.
pub fn category_for_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    let matches = |signals: &[&str]| signals.iter().any(|s| lower.contains(s));

    if matches(PERMISSION_SIGNALS) {
        ErrorCategory::Permission
    } else if matches(API_SIGNALS) {
        ErrorCategory::Api
    } else if matches(CONFIG_SIGNALS) {
        ErrorCategory::Config
    } else if matches(NETWORK_SIGNALS) {
        ErrorCategory::Network
    } else if matches(FILESYSTEM_SIGNALS) {
        ErrorCategory::Filesystem
    } else {
        ErrorCategory::Unknown
    }
}
