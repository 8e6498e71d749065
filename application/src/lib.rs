//! Application layer for llm-panel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunDefaults;
pub use ports::{
    context_loader::ContextLoaderPort,
    llm_provider::{LlmProvider, ProviderError, ProviderRegistry},
    output::{OutputWriter, RenderedDocument, ResponseRenderer, RunNamer},
    status::{NoStatus, StatusObserver},
};
pub use use_cases::execute_queries::{ExecuteQueriesUseCase, QueryOptions};
pub use use_cases::run_workflow::{
    RunContext, RunWorkflowUseCase, WorkflowInput, WorkflowOutput, WorkflowStage,
    handle_workflow_error,
};
pub use use_cases::select_models::SelectModelsUseCase;
