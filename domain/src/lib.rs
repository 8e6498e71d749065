//! Domain layer for llm-panel
//!
//! Pure types and rules with no I/O: model keys and configuration, the
//! model selector, query results and the error taxonomy.
//!
//! # Core Concepts
//!
//! ## Selection
//!
//! [`ModelSelector`] turns an [`AppConfig`] and [`SelectionCriteria`]
//! into the ordered list of models that take part in a run.
//!
//! ## Query results
//!
//! Each selected model yields exactly one [`LlmResponse`] and one
//! [`ModelQueryStatus`]; failures are captured, never raised.
//!
//! ## Errors
//!
//! Every failure surfaces as a [`PanelError`] tagged with an
//! [`ErrorCategory`].

pub mod config;
pub mod core;
pub mod error;
pub mod prompt;
pub mod query;
pub mod selection;
pub mod util;

pub use config::{AppConfig, Group, GroupInfo};
pub use core::model::{ModelConfig, ModelKeyError, ModelOptions, ModelSpec};
pub use error::{ErrorCategory, PanelError, classify, classify_with_context};
pub use prompt::{ContextDocument, PromptTemplate};
pub use query::{
    LlmResponse, ModelQueryStatus, QueryExecutionResult, QueryStatus, ResolvedSystemPrompt,
    StatusContext, StatusEvent, StatusMap, SystemPromptSource, Timing,
};
pub use selection::{
    AssumeCredentials, CredentialCheck, ModelSelector, SelectionCriteria, SelectionResult,
};
