//! Model selector: resolves which configured models take part in a run.

use super::credentials::CredentialCheck;
use super::criteria::{SelectionCriteria, SelectionResult};
use crate::config::{AppConfig, Group};
use crate::core::model::{ModelConfig, ModelSpec};
use crate::error::{PanelError, factories};
use tracing::{debug, warn};

/// Which selection branch produced the candidate list.
///
/// Drives the wording of empty-selection errors so operators get a
/// message that matches what they asked for.
#[derive(Debug, Clone, Copy)]
enum Branch<'c> {
    Explicit,
    Specific(&'c str),
    Group(&'c str),
    Groups(&'c [String]),
    All,
}

impl Branch<'_> {
    fn empty_error(&self, config: &AppConfig) -> PanelError {
        match self {
            Branch::Explicit => PanelError::config("None of the requested models are enabled")
                .with_suggestions([
                    "Set enabled = true for the requested models in the configuration file",
                    "Allow disabled models in the selection to query them anyway",
                ]),
            Branch::Specific(key) => {
                PanelError::config(format!("Model \"{}\" is disabled in configuration", key))
                    .with_suggestion("Set enabled = true for the model in the configuration file")
            }
            Branch::Group(name) => {
                PanelError::config(format!("No enabled models found in group \"{}\"", name))
                    .with_suggestion(format!(
                        "Add models to [groups.{}] or enable the ones it lists",
                        name
                    ))
            }
            Branch::Groups(names) => PanelError::config(format!(
                "No enabled models found in the specified groups: {}",
                names.join(", ")
            ))
            .with_suggestion("Enable at least one model in the requested groups"),
            Branch::All if config.models.is_empty() => {
                PanelError::config("No models are defined in configuration")
                    .with_suggestion("Add models under [[models]] in the configuration file")
            }
            Branch::All => PanelError::config("No enabled models found in configuration")
                .with_suggestions([
                    "Set enabled = true for at least one model in the configuration file",
                    "Select models explicitly with provider:modelId keys",
                ]),
        }
    }
}

/// Resolves [`SelectionCriteria`] against an [`AppConfig`].
///
/// Pure apart from the injected [`CredentialCheck`]; the same inputs
/// always yield the same selection.
pub struct ModelSelector<'a> {
    config: &'a AppConfig,
    credentials: &'a dyn CredentialCheck,
}

impl<'a> ModelSelector<'a> {
    pub fn new(config: &'a AppConfig, credentials: &'a dyn CredentialCheck) -> Self {
        Self {
            config,
            credentials,
        }
    }

    pub fn select(&self, criteria: &SelectionCriteria) -> Result<SelectionResult, PanelError> {
        let mut result = SelectionResult::default();

        let (branch, candidates) = if let Some(keys) = criteria.explicit_models() {
            let explicit = self.resolve_keys(keys, criteria, &mut result)?;
            if explicit.is_empty() {
                // Every key already produced a warning.
                return Ok(result);
            }
            let narrowed = self.narrow_by_groups(explicit, criteria, &mut result);
            (Branch::Explicit, narrowed)
        } else if let Some(key) = criteria.specific_model.as_deref() {
            // A single candidate: failing to resolve it is always terminal.
            let model = self.resolve_key(key)?;
            let narrowed = self.narrow_by_groups(vec![model], criteria, &mut result);
            (Branch::Specific(key), narrowed)
        } else if let Some(name) = criteria.group_name.as_deref() {
            let group = self
                .config
                .group(name)
                .ok_or_else(|| factories::group_not_found(name, self.config))?;
            (Branch::Group(name), group.models.clone())
        } else if let Some(names) = criteria.group_names.as_deref().filter(|n| !n.is_empty()) {
            let models = self.resolve_groups(names, criteria, &mut result)?;
            (Branch::Groups(names), models)
        } else {
            (Branch::All, self.config.models.clone())
        };

        debug!(
            "Selection branch {:?} produced {} candidate(s)",
            branch,
            candidates.len()
        );

        // A specific model is the only candidate, so losing it always fails.
        let terminal = criteria.throw_on_error || matches!(branch, Branch::Specific(_));

        let candidates = self.apply_disabled_policy(candidates, branch, criteria, &mut result);

        if candidates.is_empty() {
            let err = branch.empty_error(self.config);
            if terminal {
                return Err(err);
            }
            warn!("{}", err.message);
            result.warnings.push(err.message);
            return Ok(result);
        }

        let candidates = if criteria.validate_api_keys {
            self.drop_missing_credentials(candidates, terminal, &mut result)?
        } else {
            candidates
        };

        result.selected = candidates;
        Ok(result)
    }

    /// Resolve a single model key against the configuration.
    fn resolve_key(&self, key: &str) -> Result<ModelConfig, PanelError> {
        let spec = ModelSpec::parse_key(key)
            .map_err(|e| factories::invalid_model_format(key, Some(self.config)).with_cause(e))?;

        self.config
            .find_model(&spec)
            .cloned()
            .ok_or_else(|| factories::model_not_found(key, self.config))
    }

    /// Resolve an explicit key list, keeping input order and duplicates.
    fn resolve_keys(
        &self,
        keys: &[String],
        criteria: &SelectionCriteria,
        result: &mut SelectionResult,
    ) -> Result<Vec<ModelConfig>, PanelError> {
        let mut resolved = Vec::with_capacity(keys.len());
        let mut failures = Vec::new();

        for key in keys {
            match self.resolve_key(key) {
                Ok(model) => resolved.push(model),
                Err(err) => {
                    warn!("Skipping model \"{}\": {}", key, err.message);
                    result.warnings.push(err.message.clone());
                    failures.push(err);
                }
            }
        }

        if resolved.is_empty() && criteria.throw_on_error {
            let mut failures = failures.into_iter();
            return Err(match (failures.next(), failures.next()) {
                (Some(only), None) => only,
                (first, second) => {
                    let all: Vec<PanelError> = first.into_iter().chain(second).chain(failures).collect();
                    self.unresolvable(keys, all)
                }
            });
        }

        Ok(resolved)
    }

    fn unresolvable(&self, keys: &[String], failures: Vec<PanelError>) -> PanelError {
        let mut suggestions: Vec<String> = Vec::new();
        let mut examples: Vec<String> = Vec::new();
        for failure in &failures {
            for s in &failure.suggestions {
                if !suggestions.contains(s) {
                    suggestions.push(s.clone());
                }
            }
            for e in &failure.examples {
                if !examples.contains(e) {
                    examples.push(e.clone());
                }
            }
        }

        PanelError::config(format!(
            "None of the requested models could be resolved: {}",
            keys.join(", ")
        ))
        .with_suggestions(suggestions)
        .with_examples(examples)
    }

    /// Union of each named group's models. Unknown names become warnings;
    /// if none of the names exist the selection fails.
    fn resolve_groups(
        &self,
        names: &[String],
        criteria: &SelectionCriteria,
        result: &mut SelectionResult,
    ) -> Result<Vec<ModelConfig>, PanelError> {
        let mut models = Vec::new();
        let mut found = 0usize;

        for name in names {
            match self.config.group(name) {
                Some(group) => {
                    found += 1;
                    models.extend(group.models.iter().cloned());
                }
                None => {
                    let err = factories::group_not_found(name, self.config);
                    warn!("{}", err.message);
                    result.warnings.push(err.message);
                }
            }
        }

        if found == 0 && criteria.throw_on_error {
            return Err(PanelError::config(format!(
                "None of the requested groups exist: {}",
                names.join(", ")
            ))
            .with_suggestions(factories::group_not_found(&names[0], self.config).suggestions));
        }

        Ok(models)
    }

    /// Intersect an explicit selection with the requested groups.
    ///
    /// An empty intersection falls back to the unfiltered selection.
    fn narrow_by_groups(
        &self,
        models: Vec<ModelConfig>,
        criteria: &SelectionCriteria,
        result: &mut SelectionResult,
    ) -> Vec<ModelConfig> {
        let requested = criteria.requested_groups();
        if requested.is_empty() || models.is_empty() {
            return models;
        }

        let mut groups: Vec<&Group> = Vec::new();
        for name in requested {
            match self.config.group(name) {
                Some(group) => groups.push(group),
                None => result.warnings.push(format!(
                    "Group \"{}\" not found in configuration; it was not used as a filter",
                    name
                )),
            }
        }
        if groups.is_empty() {
            return models;
        }

        let label = describe_groups(&groups);
        let (kept, excluded): (Vec<_>, Vec<_>) = models
            .into_iter()
            .partition(|m| groups.iter().any(|g| g.contains(&m.spec)));

        if kept.is_empty() {
            let warning = format!(
                "None of the requested models belong to {}; the group filter was ignored",
                label
            );
            warn!("{}", warning);
            result.warnings.push(warning);
            return excluded;
        }

        if !excluded.is_empty() {
            result.warnings.push(format!(
                "Models not in {} were excluded: {}",
                label,
                join_keys(&excluded)
            ));
        }
        kept
    }

    fn apply_disabled_policy(
        &self,
        candidates: Vec<ModelConfig>,
        branch: Branch<'_>,
        criteria: &SelectionCriteria,
        result: &mut SelectionResult,
    ) -> Vec<ModelConfig> {
        let explicit = matches!(branch, Branch::Explicit | Branch::Specific(_));
        let keep_disabled = criteria.include_disabled
            || (matches!(branch, Branch::Specific(_)) && criteria.allow_disabled_specific_model);

        let mut kept = Vec::with_capacity(candidates.len());
        for model in candidates {
            if model.enabled {
                kept.push(model);
                continue;
            }

            push_unique(&mut result.excluded_disabled, &model);
            if keep_disabled {
                debug!("Including disabled model {}", model.key());
                kept.push(model);
            } else if explicit {
                result.warnings.push(format!(
                    "Model \"{}\" is disabled in configuration and was skipped",
                    model.key()
                ));
            }
        }
        kept
    }

    fn drop_missing_credentials(
        &self,
        candidates: Vec<ModelConfig>,
        terminal: bool,
        result: &mut SelectionResult,
    ) -> Result<Vec<ModelConfig>, PanelError> {
        let (usable, missing): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|m| self.credentials.has_credential(m.provider()));

        if missing.is_empty() {
            return Ok(usable);
        }

        for model in &missing {
            push_unique(&mut result.missing_api_key_models, model);
        }
        let warning = format!(
            "Skipping models without API keys: {}",
            join_keys(&result.missing_api_key_models)
        );
        warn!("{}", warning);
        result.warnings.push(warning);

        if usable.is_empty() {
            let err = factories::missing_api_keys(&result.missing_api_key_models);
            if terminal {
                return Err(err);
            }
            result.warnings.push(err.message);
        }

        Ok(usable)
    }
}

fn push_unique(list: &mut Vec<ModelConfig>, model: &ModelConfig) {
    if !list.iter().any(|m| m.spec == model.spec) {
        list.push(model.clone());
    }
}

fn join_keys(models: &[ModelConfig]) -> String {
    models
        .iter()
        .map(ModelConfig::key)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_groups(groups: &[&Group]) -> String {
    let quoted: Vec<String> = groups.iter().map(|g| format!("\"{}\"", g.name)).collect();
    if quoted.len() == 1 {
        format!("group {}", quoted[0])
    } else {
        format!("groups {}", quoted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::selection::AssumeCredentials;

    fn config() -> AppConfig {
        AppConfig::new(vec![
            ModelConfig::new("openai", "gpt-4o"),
            ModelConfig::new("anthropic", "claude-3-7-sonnet-latest"),
            ModelConfig::new("openrouter", "deepseek/deepseek-r1"),
            ModelConfig::new("openai", "o1-preview").disabled(),
        ])
        .with_group(
            Group::new("coding", "You are a senior engineer.")
                .with_model(ModelConfig::new("anthropic", "claude-3-7-sonnet-latest"))
                .with_model(ModelConfig::new("openrouter", "deepseek/deepseek-r1")),
        )
        .with_group(
            Group::new("writing", "You are an editor.")
                .with_model(ModelConfig::new("openai", "gpt-4o"))
                .with_model(ModelConfig::new("google", "gemini-1.5-pro").disabled()),
        )
        .with_group(Group::new("empty", "Nothing here."))
    }

    fn select(config: &AppConfig, criteria: SelectionCriteria) -> Result<SelectionResult, PanelError> {
        ModelSelector::new(config, &AssumeCredentials).select(&criteria)
    }

    fn no_keys_check() -> SelectionCriteria {
        SelectionCriteria::default().with_validate_api_keys(false)
    }

    // ==================== Explicit List ====================

    #[test]
    fn test_explicit_keys_preserve_order_without_warnings() {
        let config = config();
        let result = select(
            &config,
            no_keys_check().with_models(["openrouter:deepseek/deepseek-r1", "openai:gpt-4o"]),
        )
        .unwrap();

        assert_eq!(
            result.selected_keys(),
            vec!["openrouter:deepseek/deepseek-r1", "openai:gpt-4o"]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_explicit_duplicates_pass_through() {
        let config = config();
        let result = select(
            &config,
            no_keys_check().with_models(["openai:gpt-4o", "openai:gpt-4o"]),
        )
        .unwrap();
        assert_eq!(result.selected.len(), 2);
    }

    #[test]
    fn test_malformed_key_is_config_error_with_grammar() {
        let config = config();
        let err = select(&config, no_keys_check().with_models(["openai-gpt4"])).unwrap_err();

        assert_eq!(err.category, ErrorCategory::Config);
        assert!(err.message.contains("openai-gpt4"));
        assert!(err.suggestions.iter().any(|s| s.contains("provider:modelId")));
        assert!(!err.examples.is_empty());
        assert_eq!(err.cause_depth(), 1);
    }

    #[test]
    fn test_malformed_key_is_warning_when_others_resolve() {
        let config = config();
        let result = select(
            &config,
            no_keys_check().with_models(["openai-gpt4", "openai:gpt-4o"]),
        )
        .unwrap();

        assert_eq!(result.selected_keys(), vec!["openai:gpt-4o"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("openai-gpt4"));
    }

    #[test]
    fn test_all_unknown_keys_aggregate_into_one_error() {
        let config = config();
        let err = select(
            &config,
            no_keys_check().with_models(["openai:gpt-9", "nope"]),
        )
        .unwrap_err();

        assert_eq!(err.category, ErrorCategory::Config);
        assert!(err.message.contains("openai:gpt-9"));
        assert!(err.message.contains("nope"));
    }

    #[test]
    fn test_unknown_keys_without_throw_return_warnings() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_models(["openai:gpt-9"])
                .with_throw_on_error(false),
        )
        .unwrap();

        assert!(result.is_empty());
        assert!(result.warnings[0].contains("not found"));
    }

    // ==================== Specific Model ====================

    #[test]
    fn test_specific_model_not_found_is_terminal_even_without_throw() {
        let config = config();
        let err = select(
            &config,
            no_keys_check()
                .with_specific_model("openai:gpt-9")
                .with_throw_on_error(false),
        )
        .unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn test_disabled_specific_model_selectable_by_default() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_specific_model("openai:o1-preview")
                .with_include_disabled(false),
        )
        .unwrap();

        assert_eq!(result.selected_keys(), vec!["openai:o1-preview"]);
        assert_eq!(result.excluded_disabled.len(), 1);
    }

    #[test]
    fn test_disabled_specific_model_rejected_when_not_allowed() {
        let config = config();
        let err = select(
            &config,
            no_keys_check()
                .with_specific_model("openai:o1-preview")
                .with_include_disabled(false)
                .with_allow_disabled_specific_model(false),
        )
        .unwrap_err();
        assert_eq!(err.message, "Model \"openai:o1-preview\" is disabled in configuration");
    }

    #[test]
    fn test_disabled_specific_model_is_terminal_without_throw() {
        let config = config();
        let err = select(
            &config,
            no_keys_check()
                .with_specific_model("openai:o1-preview")
                .with_include_disabled(false)
                .with_allow_disabled_specific_model(false)
                .with_throw_on_error(false),
        )
        .unwrap_err();
        assert_eq!(err.category, ErrorCategory::Config);
        assert_eq!(err.message, "Model \"openai:o1-preview\" is disabled in configuration");
    }

    // ==================== Groups ====================

    #[test]
    fn test_group_selection() {
        let config = config();
        let result = select(&config, no_keys_check().with_group("coding")).unwrap();
        assert_eq!(
            result.selected_keys(),
            vec![
                "anthropic:claude-3-7-sonnet-latest",
                "openrouter:deepseek/deepseek-r1"
            ]
        );
    }

    #[test]
    fn test_unknown_group_is_terminal() {
        let config = config();
        let err = select(
            &config,
            no_keys_check().with_group("poetry").with_throw_on_error(false),
        )
        .unwrap_err();
        assert!(err.message.contains("\"poetry\""));
        assert!(err.suggestions[0].contains("coding"));
    }

    #[test]
    fn test_group_disabled_models_follow_include_disabled() {
        let config = config();

        let all = select(&config, no_keys_check().with_group("writing")).unwrap();
        assert_eq!(all.selected.len(), 2);
        assert_eq!(all.excluded_disabled.len(), 1);

        let enabled = select(
            &config,
            no_keys_check().with_group("writing").with_include_disabled(false),
        )
        .unwrap();
        assert_eq!(enabled.selected_keys(), vec!["openai:gpt-4o"]);
        assert_eq!(enabled.excluded_disabled[0].key(), "google:gemini-1.5-pro");
    }

    #[test]
    fn test_groups_union_without_dedup() {
        let config = config();
        let result = select(
            &config,
            no_keys_check().with_groups(["coding", "writing", "coding"]),
        )
        .unwrap();
        assert_eq!(result.selected.len(), 6);
    }

    #[test]
    fn test_groups_unknown_names_warn() {
        let config = config();
        let result = select(
            &config,
            no_keys_check().with_groups(["coding", "poetry"]),
        )
        .unwrap();
        assert_eq!(result.selected.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("poetry")));
    }

    // ==================== Intersection ====================

    #[test]
    fn test_models_and_group_intersect() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_models(["openai:gpt-4o", "anthropic:claude-3-7-sonnet-latest"])
                .with_group("coding"),
        )
        .unwrap();

        assert_eq!(
            result.selected_keys(),
            vec!["anthropic:claude-3-7-sonnet-latest"]
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("openai:gpt-4o"));
        assert!(result.warnings[0].contains("\"coding\""));
    }

    #[test]
    fn test_empty_intersection_falls_back_to_explicit_models() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_models(["openai:gpt-4o", "openai:o1-preview"])
                .with_group("coding"),
        )
        .unwrap();

        assert_eq!(
            result.selected_keys(),
            vec!["openai:gpt-4o", "openai:o1-preview"]
        );
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("group filter was ignored"))
        );
    }

    #[test]
    fn test_specific_model_and_group_fallback() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_specific_model("openai:gpt-4o")
                .with_group("coding"),
        )
        .unwrap();
        assert_eq!(result.selected_keys(), vec!["openai:gpt-4o"]);
        assert!(result.warnings[0].contains("group filter was ignored"));
    }

    // ==================== Defaults & Disabled ====================

    #[test]
    fn test_default_includes_disabled_but_reports_them() {
        let config = config();
        let result = select(&config, no_keys_check()).unwrap();
        assert_eq!(result.selected.len(), 4);
        assert_eq!(result.excluded_disabled[0].key(), "openai:o1-preview");
    }

    #[test]
    fn test_default_without_disabled() {
        let config = config();
        let result = select(&config, no_keys_check().with_include_disabled(false)).unwrap();
        assert_eq!(result.selected.len(), 3);
        assert!(!result.selected_keys().contains(&"openai:o1-preview".to_string()));
        assert_eq!(result.excluded_disabled.len(), 1);
    }

    #[test]
    fn test_explicit_disabled_model_skipped_with_warning() {
        let config = config();
        let result = select(
            &config,
            no_keys_check()
                .with_models(["openai:o1-preview", "openai:gpt-4o"])
                .with_include_disabled(false),
        )
        .unwrap();
        assert_eq!(result.selected_keys(), vec!["openai:gpt-4o"]);
        assert!(result.warnings[0].contains("disabled"));
    }

    #[test]
    fn test_empty_selection_messages_are_branch_specific() {
        let disabled_only = AppConfig::new(vec![ModelConfig::new("openai", "gpt-4o").disabled()])
            .with_group(
                Group::new("g", "p").with_model(ModelConfig::new("openai", "gpt-4o").disabled()),
            );
        let criteria = no_keys_check().with_include_disabled(false);

        let all = select(&disabled_only, criteria.clone()).unwrap_err();
        assert_eq!(all.message, "No enabled models found in configuration");

        let group = select(&disabled_only, criteria.clone().with_group("g")).unwrap_err();
        assert_eq!(group.message, "No enabled models found in group \"g\"");

        let groups = select(&disabled_only, criteria.clone().with_groups(["g"])).unwrap_err();
        assert!(groups.message.starts_with("No enabled models found in the specified groups"));

        let explicit = select(&disabled_only, criteria.with_models(["openai:gpt-4o"])).unwrap_err();
        assert_eq!(explicit.message, "None of the requested models are enabled");

        let nothing = select(&AppConfig::default(), no_keys_check()).unwrap_err();
        assert_eq!(nothing.message, "No models are defined in configuration");
    }

    #[test]
    fn test_empty_selection_without_throw_is_warning() {
        let result = select(
            &AppConfig::default(),
            no_keys_check().with_throw_on_error(false),
        )
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.warnings, vec!["No models are defined in configuration"]);
    }

    // ==================== Credentials ====================

    #[test]
    fn test_missing_credentials_are_removed_with_warning() {
        let config = config();
        let only_openai = |provider: &str| provider == "openai";
        let result = ModelSelector::new(&config, &only_openai)
            .select(&SelectionCriteria::default().with_include_disabled(false))
            .unwrap();

        assert_eq!(result.selected_keys(), vec!["openai:gpt-4o"]);
        assert_eq!(result.missing_api_key_models.len(), 2);
        assert!(result.warnings[0].contains("anthropic:claude-3-7-sonnet-latest"));
        assert!(result.warnings[0].contains("openrouter:deepseek/deepseek-r1"));
    }

    #[test]
    fn test_no_credentials_raises_api_error() {
        let config = config();
        let none = |_: &str| false;
        let err = ModelSelector::new(&config, &none)
            .select(&SelectionCriteria::default())
            .unwrap_err();

        assert_eq!(err.category, ErrorCategory::Api);
        assert!(err.message.contains("No models with valid API keys available"));
        for provider in ["OPENAI", "ANTHROPIC", "OPENROUTER"] {
            assert!(
                err.suggestions
                    .iter()
                    .any(|s| s.contains(&format!("{}_API_KEY", provider)))
            );
        }
    }

    #[test]
    fn test_no_credentials_without_throw() {
        let config = config();
        let none = |_: &str| false;
        let result = ModelSelector::new(&config, &none)
            .select(&SelectionCriteria::default().with_throw_on_error(false))
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.missing_api_key_models.len(), 4);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("No models with valid API keys available"))
        );
    }

    #[test]
    fn test_specific_model_without_credentials_is_terminal_without_throw() {
        let config = config();
        let none = |_: &str| false;
        let err = ModelSelector::new(&config, &none)
            .select(
                &SelectionCriteria::default()
                    .with_specific_model("openai:gpt-4o")
                    .with_throw_on_error(false),
            )
            .unwrap_err();

        assert_eq!(err.category, ErrorCategory::Api);
        assert!(err.message.contains("No models with valid API keys available"));
        assert!(err.message.contains("openai:gpt-4o"));
    }
}
