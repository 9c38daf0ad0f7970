use crate::core::form_data::FieldLookup;
use crate::core::step::{StepId, StepRequirements};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read wizard config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid wizard YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid wizard JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("wizard '{wizard}' step {step} has an empty required field name")]
    EmptyFieldName { wizard: String, step: StepId },
}

/// Static step table for one wizard type. Steps always iterate in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lookup: FieldLookup,
    #[serde(default)]
    steps: BTreeMap<StepId, StepRequirements>,
}

impl WizardConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_lookup(mut self, lookup: FieldLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Adds or replaces the requirements for `id`.
    pub fn step(mut self, id: StepId, requirements: StepRequirements) -> Self {
        self.steps.insert(id, requirements);
        self
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.checked()
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.checked()
    }

    /// Loads a table from disk. `.json` files are JSON, everything else YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&raw)?
        } else {
            Self::from_yaml_str(&raw)?
        };
        tracing::debug!(
            path = %path.display(),
            wizard = %config.name,
            steps = config.len(),
            "loaded wizard config"
        );
        Ok(config)
    }

    fn checked(self) -> Result<Self, ConfigError> {
        for (id, requirements) in &self.steps {
            if requirements.fields().iter().any(|f| f.trim().is_empty()) {
                tracing::warn!(wizard = %self.name, step = %id, "rejecting empty field name");
                return Err(ConfigError::EmptyFieldName {
                    wizard: self.name.clone(),
                    step: *id,
                });
            }
        }
        Ok(self)
    }

    pub fn requirements(&self, id: StepId) -> Option<&StepRequirements> {
        self.steps.get(&id)
    }

    pub fn steps(&self) -> impl Iterator<Item = (StepId, &StepRequirements)> {
        self.steps.iter().map(|(id, reqs)| (*id, reqs))
    }

    pub fn step_ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.keys().copied()
    }

    pub fn first_step(&self) -> Option<StepId> {
        self.steps.keys().next().copied()
    }

    pub fn last_step(&self) -> Option<StepId> {
        self.steps.keys().next_back().copied()
    }

    pub fn next_step_after(&self, id: StepId) -> Option<StepId> {
        self.steps
            .range((std::ops::Bound::Excluded(id), std::ops::Bound::Unbounded))
            .next()
            .map(|(id, _)| *id)
    }

    pub fn previous_step_before(&self, id: StepId) -> Option<StepId> {
        self.steps.range(..id).next_back().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
