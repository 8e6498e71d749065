//! Combining instructions with context documents

use crate::error::PanelError;
use serde::{Deserialize, Serialize};

/// A context document loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Path as shown to the model (relative to where it was given).
    pub path: String,
    pub content: String,
}

impl ContextDocument {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Builds the prompt text sent to every model.
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instructions first, then one `<document>` per context document
    /// inside a `<context>` block. No block is emitted without documents.
    pub fn combine(instructions: &str, documents: &[ContextDocument]) -> Result<String, PanelError> {
        let instructions = instructions.trim();
        if instructions.is_empty() {
            return Err(PanelError::config("Instructions are empty")
                .with_suggestion("Write the request for the models into the instructions file"));
        }

        if documents.is_empty() {
            return Ok(instructions.to_string());
        }

        let mut prompt = String::with_capacity(
            instructions.len() + documents.iter().map(|d| d.content.len() + 64).sum::<usize>(),
        );
        prompt.push_str(instructions);
        prompt.push_str("\n\n<context>\n");
        for doc in documents {
            prompt.push_str(&format!(
                "<document path=\"{}\">\n{}\n</document>\n",
                escape_attr(&doc.path),
                doc.content.trim_end()
            ));
        }
        prompt.push_str("</context>");
        Ok(prompt)
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
