//! Target tasks method trait

use taskgraph_core::error::Result;
use taskgraph_core::parameters::Parameters;
use taskgraph_tasks::TaskGraph;

/// A strategy computing the target tasks of a push.
///
/// Implementations return the selected labels without duplicates, in an
/// order that is stable for a given graph and parameters.
pub trait TargetTasksMethod: Send + Sync {
    /// Select target task labels from the full task graph
    fn select(&self, task_graph: &TaskGraph, parameters: &Parameters) -> Result<Vec<String>>;
}

impl<F> TargetTasksMethod for F
where
    F: Fn(&TaskGraph, &Parameters) -> Result<Vec<String>> + Send + Sync,
{
    fn select(&self, task_graph: &TaskGraph, parameters: &Parameters) -> Result<Vec<String>> {
        self(task_graph, parameters)
    }
}
