//! Query execution value objects: per-model status, responses, the
//! aggregated result and the rules that shape each request.

pub mod reasoning;
mod response;
mod result;
mod status;
mod system_prompt;

pub use reasoning::{request_options, supports_extended_reasoning};
pub use response::{LlmResponse, ResponseMetadata};
pub use result::{QueryExecutionResult, StatusMap, Timing};
pub use status::{ModelQueryStatus, QueryStatus, StatusContext, StatusEvent};
pub use system_prompt::{ResolvedSystemPrompt, SystemPromptSource, resolve_system_prompt};
