//! Taskgraph Core - Foundations for target-task selection
//!
//! This crate provides the error types, the immutable dependency graph,
//! selection parameters and configuration shared by the task and
//! strategy crates.

pub mod config;
pub mod error;
pub mod graph;
pub mod parameters;

pub use config::{ProjectSets, SelectionConfig, TrySyntaxConfig};
pub use error::{ConfigError, GraphError, Result, TargetTasksError, TaskGraphError, TaskgraphError};
pub use graph::{Direction, Graph};
pub use parameters::Parameters;
