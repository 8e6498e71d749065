//! LLM provider adapters
//!
//! [`StaticProviderRegistry`] is always available. The HTTP adapters
//! (OpenAI-compatible chat completions and the Anthropic messages API)
//! are compiled with the `http-providers` feature.

mod registry;

#[cfg(feature = "http-providers")]
pub mod anthropic;
#[cfg(feature = "http-providers")]
mod http;
#[cfg(feature = "http-providers")]
pub mod openai;

pub use registry::StaticProviderRegistry;

#[cfg(feature = "http-providers")]
pub use anthropic::AnthropicProvider;
#[cfg(feature = "http-providers")]
pub use openai::OpenAiCompatibleProvider;
