//! Task graph: a graph whose nodes are labelled with task records

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use taskgraph_core::error::{Result, TaskGraphError};
use taskgraph_core::graph::{Direction, Graph};

use crate::task::Task;

/// One task in the JSON form: the task record plus the labels it depends on,
/// keyed by dependency name
#[derive(Debug, Serialize, Deserialize)]
struct TaskEntry {
    #[serde(flatten)]
    task: Task,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// The complete set of tasks for a push plus their dependency edges.
///
/// There is exactly one task per graph node, stored under its own label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGraph {
    tasks: BTreeMap<String, Task>,
    graph: Graph,
}

impl TaskGraph {
    /// Pair a graph with its task records.
    ///
    /// Fails if the task keys do not exactly match the graph's nodes, if a
    /// task is stored under a key other than its label, or if a label is
    /// empty.
    pub fn new(tasks: BTreeMap<String, Task>, graph: Graph) -> std::result::Result<Self, TaskGraphError> {
        for (key, task) in &tasks {
            if task.label.is_empty() {
                return Err(TaskGraphError::EmptyLabel);
            }
            if key != &task.label {
                return Err(TaskGraphError::LabelMismatch {
                    key: key.clone(),
                    label: task.label.clone(),
                });
            }
            if !graph.contains(key) {
                return Err(TaskGraphError::OrphanTask(key.clone()));
            }
        }

        if let Some(missing) = graph.nodes().iter().find(|n| !tasks.contains_key(*n)) {
            return Err(TaskGraphError::MissingTask(missing.clone()));
        }

        debug!(
            task_count = tasks.len(),
            edge_count = graph.edges().len(),
            "task graph built"
        );

        Ok(Self { tasks, graph })
    }

    /// Build a task graph from task records and edges between their labels
    pub fn from_tasks<I>(tasks: I, edges: BTreeSet<(String, String)>) -> Result<Self>
    where
        I: IntoIterator<Item = Task>,
    {
        let mut by_label: BTreeMap<String, Task> = BTreeMap::new();
        for task in tasks {
            if by_label.contains_key(&task.label) {
                return Err(TaskGraphError::DuplicateLabel(task.label).into());
            }
            by_label.insert(task.label.clone(), task);
        }
        let tasks = by_label;
        let graph = Graph::new(tasks.keys().cloned().collect(), edges)?;

        Ok(Self::new(tasks, graph)?)
    }

    /// Build a task graph from its JSON form.
    ///
    /// The document maps each label to a task record with an optional
    /// `dependencies` object; every dependency becomes an edge from the task
    /// to the dependency's label.
    pub fn from_json(value: Value) -> Result<Self> {
        let entries: BTreeMap<String, TaskEntry> = serde_json::from_value(value)?;

        let mut edges = BTreeSet::new();
        let mut tasks = BTreeMap::new();
        for (key, entry) in entries {
            for dependency in entry.dependencies.into_values() {
                edges.insert((key.clone(), dependency));
            }
            tasks.insert(key, entry.task);
        }

        let graph = Graph::new(tasks.keys().cloned().collect(), edges)?;
        Ok(Self::new(tasks, graph)?)
    }

    /// Serialize to the JSON form read by [`TaskGraph::from_json`].
    ///
    /// Dependency names are not kept by the graph, so each dependency is
    /// named after its label.
    pub fn to_json(&self) -> Result<Value> {
        let links = self.graph.links(Direction::Outgoing);
        let entries: BTreeMap<&str, TaskEntry> = self
            .iter()
            .map(|task| {
                let dependencies = links
                    .get(task.label.as_str())
                    .into_iter()
                    .flatten()
                    .map(|dep| (dep.to_string(), dep.to_string()))
                    .collect();
                let entry = TaskEntry {
                    task: task.clone(),
                    dependencies,
                };
                (task.label.as_str(), entry)
            })
            .collect();

        Ok(serde_json::to_value(entries)?)
    }

    /// Load a task graph from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading task graph");
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_json(value)
    }

    /// All tasks, keyed by label
    pub fn tasks(&self) -> &BTreeMap<String, Task> {
        &self.tasks
    }

    /// The underlying graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Get a task by label
    pub fn get(&self, label: &str) -> Option<&Task> {
        self.tasks.get(label)
    }

    /// Iterate over tasks in node order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.graph.nodes().iter().filter_map(|label| self.tasks.get(label))
    }

    /// Get the total number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the task graph is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
