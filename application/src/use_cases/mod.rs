//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_queries;
pub mod run_workflow;
pub mod select_models;
