//! Model selection
//!
//! Turns [`SelectionCriteria`] into the ordered list of models a run will
//! query. See [`ModelSelector`] for branch precedence and the rules for
//! groups, disabled models and credentials.

mod credentials;
mod criteria;
mod selector;

pub use credentials::{AssumeCredentials, CredentialCheck, api_key_env_var};
pub use criteria::{SelectionCriteria, SelectionResult};
pub use selector::ModelSelector;
