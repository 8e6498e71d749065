//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelSpec`]: a `provider:modelId` identity
//! - [`model::ModelConfig`]: a configured model with eligibility and options

pub mod model;
