//! Application configuration: configured models and named groups.

use crate::core::model::{ModelConfig, ModelSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named bundle of models sharing a default system prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub system_prompt: String,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl Group {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            models: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.models.push(model);
        self
    }

    pub fn contains(&self, spec: &ModelSpec) -> bool {
        self.models.iter().any(|m| &m.spec == spec)
    }

    pub fn info(&self) -> GroupInfo {
        GroupInfo::new(&self.name, &self.system_prompt)
    }
}

/// The group a model was answered under and the system prompt used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    pub system_prompt: String,
}

impl GroupInfo {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

/// Resolved application configuration.
///
/// Immutable for the duration of a run. Groups are keyed by name and
/// iterate in name order, which makes group lookup deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,
}

impl AppConfig {
    pub fn new(models: Vec<ModelConfig>) -> Self {
        Self {
            models,
            groups: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.insert(group.name.clone(), group);
        self
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Find a model by identity: top-level models first, then group members.
    pub fn find_model(&self, spec: &ModelSpec) -> Option<&ModelConfig> {
        self.models
            .iter()
            .chain(self.groups.values().flat_map(|g| g.models.iter()))
            .find(|m| &m.spec == spec)
    }

    /// The first group (in name order) that lists this model.
    pub fn find_group_for(&self, spec: &ModelSpec) -> Option<GroupInfo> {
        self.groups
            .values()
            .find(|g| g.contains(spec))
            .map(Group::info)
    }

    /// Every distinct model key known to the configuration, in
    /// declaration order (top-level models first).
    pub fn model_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for model in self
            .models
            .iter()
            .chain(self.groups.values().flat_map(|g| g.models.iter()))
        {
            let key = model.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.groups.values().all(|g| g.models.is_empty())
    }
}
