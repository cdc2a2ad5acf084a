//! Selection parameters supplied by the driver for one push

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FileFormat;
use crate::error::{Result, TargetTasksError};

/// Name of the parameter holding the project (repository/branch) of the push
pub const PROJECT: &str = "project";

/// Name of the parameter holding the raw try-syntax message
pub const MESSAGE: &str = "message";

/// Parameters for a target task selection.
///
/// Only `project` and `message` are interpreted by the bundled strategies;
/// any other key is carried through untouched for custom strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, Value>,
}

impl Parameters {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set the project parameter
    pub fn with_project(self, project: impl Into<String>) -> Self {
        self.with(PROJECT, project.into())
    }

    /// Set the try-syntax message parameter
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with(MESSAGE, message.into())
    }

    /// Get a raw parameter value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check whether a parameter is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get a required string parameter
    pub fn get_str(&self, key: &str) -> std::result::Result<&str, TargetTasksError> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| TargetTasksError::MissingParameter(key.to_string()))
    }

    /// The project the push was made to
    pub fn project(&self) -> std::result::Result<&str, TargetTasksError> {
        self.get_str(PROJECT)
    }

    /// The raw try-syntax message
    pub fn message(&self) -> std::result::Result<&str, TargetTasksError> {
        self.get_str(MESSAGE)
    }

    /// Iterate over all parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load parameters from a JSON, YAML or TOML file, chosen by extension
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), format = ?FileFormat::from_path(path), "loading parameters");
        let params: Parameters = FileFormat::read(path)?;
        debug!(count = params.values.len(), "parameters loaded");
        Ok(params)
    }
}

impl FromIterator<(String, Value)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
