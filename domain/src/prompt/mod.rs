//! Prompt domain
//!
//! Builds the single prompt text every selected model receives.

mod template;

pub use template::{ContextDocument, PromptTemplate};
