//! Built-in defaults used when configuration leaves a value unset.

/// Per-model request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Reasoning budget sent to models that support extended reasoning.
pub const THINKING_BUDGET_TOKENS: u64 = 16_000;

/// Directory (relative to the working directory) runs are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "panel-output";

/// System prompt used when neither the caller, the model nor its group
/// provides one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, knowledgeable assistant. \
Answer the request thoroughly and accurately, state any assumptions you make, \
and format your answer in Markdown.";
