//! Presentation layer for llm-panel
//!
//! This crate contains the CLI definition, response rendering, the
//! console summary and per-model progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use output::markdown::MarkdownRenderer;
pub use progress::reporter::{SimpleStatusPrinter, StatusReporter};
