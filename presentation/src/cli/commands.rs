//! CLI command definitions

use clap::Parser;
use panel_application::RunDefaults;
use panel_domain::SelectionCriteria;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for llm-panel
#[derive(Parser, Debug)]
#[command(name = "llm-panel")]
#[command(author, version, about = "Send one prompt to a panel of LLMs and collect every answer")]
#[command(long_about = r#"
llm-panel sends one prompt (plus optional context files) to a set of models
concurrently and writes each answer to its own markdown file.

Model selection (first match wins):
1. --model <KEY>...          Explicit provider:modelId keys
2. --specific-model <KEY>    A single model; failure is always fatal
3. --group <NAME>            One configured group (repeat for several)
4. (none)                    Every configured model

A group given together with --model narrows the explicit list.

Configuration files are loaded from (in priority order):
1. PANEL_* environment variables
2. --config <path>     Explicit config file
3. ./panel.toml        Project-level config
4. ~/.config/llm-panel/config.toml   Global config

Example:
  llm-panel prompt.md
  llm-panel prompt.md src/ -m openai:gpt-4o -m anthropic:claude-3-7-sonnet-latest
  llm-panel prompt.md --group coding --thinking
"#)]
pub struct Cli {
    /// File containing the instructions sent to every model
    #[arg(value_name = "INSTRUCTIONS")]
    pub instructions: PathBuf,

    /// Context files or directories appended to the prompt
    #[arg(value_name = "CONTEXT")]
    pub context: Vec<PathBuf>,

    /// Models to query as provider:modelId (can be specified multiple times)
    #[arg(short, long, value_name = "KEY")]
    pub model: Vec<String>,

    /// Query exactly one model
    #[arg(long, value_name = "KEY", conflicts_with = "model")]
    pub specific_model: Option<String>,

    /// Restrict to a configured group (repeat for several groups)
    #[arg(short, long, value_name = "NAME")]
    pub group: Vec<String>,

    /// System prompt sent to every model, replacing configured prompts
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Per-model timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Request extended reasoning from models that support it
    #[arg(long)]
    pub thinking: bool,

    /// Leave disabled models out of the selection
    #[arg(long)]
    pub skip_disabled: bool,

    /// With --skip-disabled, still allow a disabled --specific-model
    #[arg(long, requires = "specific_model")]
    pub allow_disabled_specific: bool,

    /// Do not check for API keys before querying
    #[arg(long)]
    pub no_key_check: bool,

    /// Directory runs are written under
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Print the run result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Selection criteria from the selection flags. One `--group` selects
    /// that group; several select their union.
    pub fn selection_criteria(&self) -> SelectionCriteria {
        let mut criteria = SelectionCriteria::default()
            .with_include_disabled(!self.skip_disabled)
            .with_validate_api_keys(!self.no_key_check)
            .with_allow_disabled_specific_model(self.allow_disabled_specific);

        if !self.model.is_empty() {
            criteria = criteria.with_models(self.model.iter().cloned());
        }
        if let Some(key) = &self.specific_model {
            criteria = criteria.with_specific_model(key.clone());
        }
        match self.group.as_slice() {
            [] => {}
            [single] => criteria = criteria.with_group(single.clone()),
            many => criteria = criteria.with_groups(many.iter().cloned()),
        }
        criteria
    }

    pub fn timeout(&self, defaults: &RunDefaults) -> Duration {
        self.timeout
            .map(Duration::from_millis)
            .unwrap_or_else(|| defaults.timeout())
    }

    pub fn output_dir(&self, defaults: &RunDefaults) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| defaults.output_dir.clone())
    }

    /// Blank `--system-prompt` values count as absent.
    pub fn system_prompt_override(&self) -> Option<String> {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
    }
}
