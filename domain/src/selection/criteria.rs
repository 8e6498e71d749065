//! Selection criteria and results

use crate::core::model::ModelConfig;
use serde::{Deserialize, Serialize};

/// What the caller asked for.
///
/// Branch precedence when several fields are set: `models`, then
/// `specific_model`, then `group_name`, then `group_names`, then every
/// configured model. A group given alongside `models`/`specific_model`
/// narrows the explicit selection instead of replacing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Explicit `provider:modelId` keys.
    pub models: Option<Vec<String>>,
    /// A single explicit model key.
    pub specific_model: Option<String>,
    pub group_name: Option<String>,
    pub group_names: Option<Vec<String>>,
    /// Keep disabled models in the selection (they are still reported).
    pub include_disabled: bool,
    pub validate_api_keys: bool,
    /// Fail instead of returning an empty selection with warnings.
    pub throw_on_error: bool,
    /// A disabled `specific_model` stays selectable even when
    /// `include_disabled` is false.
    pub allow_disabled_specific_model: bool,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            models: None,
            specific_model: None,
            group_name: None,
            group_names: None,
            include_disabled: true,
            validate_api_keys: true,
            throw_on_error: true,
            allow_disabled_specific_model: true,
        }
    }
}

impl SelectionCriteria {
    // ==================== Builder Methods ====================

    pub fn with_models<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_specific_model(mut self, key: impl Into<String>) -> Self {
        self.specific_model = Some(key.into());
        self
    }

    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    pub fn with_groups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_include_disabled(mut self, include: bool) -> Self {
        self.include_disabled = include;
        self
    }

    pub fn with_validate_api_keys(mut self, validate: bool) -> Self {
        self.validate_api_keys = validate;
        self
    }

    pub fn with_throw_on_error(mut self, throw: bool) -> Self {
        self.throw_on_error = throw;
        self
    }

    pub fn with_allow_disabled_specific_model(mut self, allow: bool) -> Self {
        self.allow_disabled_specific_model = allow;
        self
    }

    /// Explicit keys, ignoring an empty list.
    pub(crate) fn explicit_models(&self) -> Option<&[String]> {
        self.models.as_deref().filter(|keys| !keys.is_empty())
    }

    /// Group names requested through either group field.
    pub(crate) fn requested_groups(&self) -> Vec<&str> {
        if let Some(name) = &self.group_name {
            return vec![name.as_str()];
        }
        self.group_names
            .iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Outcome of model selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Models to query, in selection order.
    pub selected: Vec<ModelConfig>,
    pub missing_api_key_models: Vec<ModelConfig>,
    pub excluded_disabled: Vec<ModelConfig>,
    pub warnings: Vec<String>,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected_keys(&self) -> Vec<String> {
        self.selected.iter().map(ModelConfig::key).collect()
    }
}
