//! Project-based target task selection

use tracing::{debug, info, instrument};

use taskgraph_core::config::ProjectSets;
use taskgraph_core::error::Result;
use taskgraph_core::parameters::Parameters;
use taskgraph_tasks::{Task, TaskGraph};

use crate::traits::TargetTasksMethod;

/// Attribute listing the projects a task runs on
pub const RUN_ON_PROJECTS: &str = "run_on_projects";

/// Check a `run_on_projects` token list against a project.
///
/// `all` matches anything, `integration` and `release` match members of the
/// corresponding set, and any other token matches only the project of the
/// same name. An empty list matches nothing.
pub fn run_on_projects_matches<S: AsRef<str>>(
    tokens: &[S],
    project: &str,
    projects: &ProjectSets,
) -> bool {
    tokens.iter().any(|token| match token.as_ref() {
        "all" => true,
        "integration" => project == "integration" || projects.is_integration(project),
        "release" => project == "release" || projects.is_release(project),
        literal => literal == project,
    })
}

/// Selects tasks whose `run_on_projects` attribute matches the push project
#[derive(Debug, Clone, Default)]
pub struct DefaultStrategy {
    projects: ProjectSets,
}

impl DefaultStrategy {
    /// Registry name of this strategy
    pub const NAME: &'static str = "default";

    /// Create a strategy with the given branch sets
    pub fn new(projects: ProjectSets) -> Self {
        Self { projects }
    }

    /// Branch sets used for `integration` and `release`
    pub fn projects(&self) -> &ProjectSets {
        &self.projects
    }

    fn task_selected(&self, task: &Task, project: &str) -> bool {
        match task.attr_list(RUN_ON_PROJECTS) {
            Some(tokens) => run_on_projects_matches(tokens, project, &self.projects),
            None => {
                if task.has_attribute(RUN_ON_PROJECTS) {
                    debug!(task = %task.label, "run_on_projects is not a list, skipping");
                }
                false
            }
        }
    }
}

impl TargetTasksMethod for DefaultStrategy {
    #[instrument(skip_all, fields(strategy = DefaultStrategy::NAME))]
    fn select(&self, task_graph: &TaskGraph, parameters: &Parameters) -> Result<Vec<String>> {
        let project = parameters.project()?;

        let selected: Vec<String> = task_graph
            .iter()
            .filter(|task| self.task_selected(task, project))
            .map(|task| task.label.clone())
            .collect();

        info!(
            project,
            total = task_graph.len(),
            selected = selected.len(),
            "default target tasks selected"
        );
        Ok(selected)
    }
}
