//! System prompt precedence

use crate::config::GroupInfo;
use crate::config::defaults::DEFAULT_SYSTEM_PROMPT;
use crate::core::model::ModelConfig;
use serde::{Deserialize, Serialize};

/// Where the system prompt sent with a query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemPromptSource {
    CliOverride,
    ModelConfig,
    GroupConfig,
    DefaultFallback,
}

impl SystemPromptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemPromptSource::CliOverride => "cli-override",
            SystemPromptSource::ModelConfig => "model-config",
            SystemPromptSource::GroupConfig => "group-config",
            SystemPromptSource::DefaultFallback => "default-fallback",
        }
    }
}

impl std::fmt::Display for SystemPromptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSystemPrompt {
    pub text: String,
    pub source: SystemPromptSource,
}

/// Pick the system prompt for one model.
///
/// Precedence: caller override, the model's own prompt, its group's
/// prompt, then [`DEFAULT_SYSTEM_PROMPT`]. Blank prompts are skipped.
pub fn resolve_system_prompt(
    override_prompt: Option<&str>,
    model: &ModelConfig,
    group: Option<&GroupInfo>,
) -> ResolvedSystemPrompt {
    let non_blank = |s: &&str| !s.trim().is_empty();

    let (text, source) = if let Some(text) = override_prompt.filter(non_blank) {
        (text, SystemPromptSource::CliOverride)
    } else if let Some(text) = model.system_prompt.as_deref().filter(non_blank) {
        (text, SystemPromptSource::ModelConfig)
    } else if let Some(text) = group.map(|g| g.system_prompt.as_str()).filter(non_blank) {
        (text, SystemPromptSource::GroupConfig)
    } else {
        (DEFAULT_SYSTEM_PROMPT, SystemPromptSource::DefaultFallback)
    };

    ResolvedSystemPrompt {
        text: text.to_string(),
        source,
    }
}
