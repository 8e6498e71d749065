//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement. The credential check lives in the domain
//! ([`panel_domain::CredentialCheck`]) because the selector consumes it.

pub mod context_loader;
pub mod llm_provider;
pub mod output;
pub mod status;
