//! The classified error value shared by every layer.

use super::category::ErrorCategory;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// A classified error carrying remediation guidance.
///
/// Every failure that reaches an operator is expressed as a `PanelError`:
/// a [`category`](Self::category) discriminant, a message, ordered
/// suggestions and example invocations, plus category-specific fields
/// (`provider_id` for [`ErrorCategory::Api`], `file_path` for
/// [`ErrorCategory::Filesystem`]).
///
/// The wrapped cause is reachable through [`std::error::Error::source`],
/// so the full chain can be walked with the standard API. The cause is
/// reference-counted which keeps the error `Clone`; per-model statuses
/// hold a copy of the error that ended the query.
#[derive(Debug, Clone)]
pub struct PanelError {
    pub category: ErrorCategory,
    pub message: String,
    pub suggestions: Vec<String>,
    pub examples: Vec<String>,
    pub provider_id: Option<String>,
    pub file_path: Option<PathBuf>,
    cause: Option<Cause>,
}

impl PanelError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            suggestions: Vec::new(),
            examples: Vec::new(),
            provider_id: None,
            file_path: None,
            cause: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Config, message)
    }

    /// An API failure attributed to a provider.
    pub fn api(provider_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Api, message).with_provider(provider_id)
    }

    /// A filesystem failure attributed to a path.
    pub fn filesystem(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Filesystem, message).with_file_path(path)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Permission, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unknown, message)
    }

    // ==================== Builder Methods ====================

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions
            .extend(suggestions.into_iter().map(Into::into));
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }

    pub fn with_provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    pub fn with_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Attach the error this one was derived from.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn with_boxed_cause(self, cause: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        self.with_shared_cause(Arc::from(cause))
    }

    pub(crate) fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    // ==================== Accessors ====================

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Number of errors chained beneath this one.
    pub fn cause_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = StdError::source(self);
        while let Some(err) = current {
            depth += 1;
            current = err.source();
        }
        depth
    }

    /// Walk the cause chain looking for an error of type `E`.
    pub fn find_cause<E: StdError + 'static>(&self) -> Option<&E> {
        let mut current = StdError::source(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Render the error as an operator-facing block.
    ///
    /// ```text
    /// Configuration Error
    /// Invalid model format: "openai-gpt4"
    ///
    /// Suggestions:
    ///   - Model keys use the format provider:modelId
    ///
    /// Examples:
    ///   llm-panel prompt.md --model openai:gpt-4o
    /// ```
    pub fn format(&self) -> String {
        let mut out = format!("{} Error\n{}\n", self.category.label(), self.message);

        if !self.suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                out.push_str(&format!("  - {}\n", suggestion));
            }
        }

        if !self.examples.is_empty() {
            out.push_str("\nExamples:\n");
            for example in &self.examples {
                out.push_str(&format!("  {}\n", example));
            }
        }

        out
    }
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for PanelError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
