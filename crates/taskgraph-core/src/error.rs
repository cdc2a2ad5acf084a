//! Error types for target-task selection

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TaskgraphError
pub type Result<T> = std::result::Result<T, TaskgraphError>;

/// Main error type for taskgraph operations
#[derive(Debug, Error)]
pub enum TaskgraphError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Graph structure errors
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Task graph structure errors
    #[error(transparent)]
    TaskGraph(#[from] TaskGraphError),

    /// Target task selection errors
    #[error(transparent)]
    TargetTasks(#[from] TargetTasksError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while constructing a [`Graph`](crate::graph::Graph)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint is not a member of the node set
    #[error("Invalid graph: edge {from} -> {to} references unknown node '{missing}'")]
    InvalidGraph {
        from: String,
        to: String,
        missing: String,
    },
}

/// Errors raised while pairing a graph with its task records
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskGraphError {
    /// A graph node has no task record
    #[error("Invalid task graph: node '{0}' has no task")]
    MissingTask(String),

    /// A task record has no graph node
    #[error("Invalid task graph: task '{0}' is not a node of the graph")]
    OrphanTask(String),

    /// A task is stored under a key other than its own label
    #[error("Invalid task graph: task labelled '{label}' stored under '{key}'")]
    LabelMismatch { key: String, label: String },

    /// A task has an empty label
    #[error("Invalid task graph: task labels must not be empty")]
    EmptyLabel,

    /// Two task records share a label
    #[error("Invalid task graph: label '{0}' is used by more than one task")]
    DuplicateLabel(String),
}

/// Errors raised while computing target tasks
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetTasksError {
    /// No strategy registered under the requested name
    #[error("Unknown target tasks strategy '{0}'")]
    UnknownStrategy(String),

    /// A required parameter is absent or has the wrong type
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),
}
