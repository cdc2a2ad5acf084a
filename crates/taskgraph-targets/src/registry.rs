//! Strategy registry

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use taskgraph_core::config::SelectionConfig;
use taskgraph_core::error::{Result, TargetTasksError};
use taskgraph_core::parameters::Parameters;
use taskgraph_tasks::TaskGraph;

use crate::default::DefaultStrategy;
use crate::traits::TargetTasksMethod;
use crate::try_select::TryOptionSyntaxStrategy;

/// Registry of target task strategies, keyed by name
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn TargetTasksMethod>>,
}

impl StrategyRegistry {
    /// Create a new registry with the built-in strategies
    pub fn new() -> Self {
        Self::with_config(&SelectionConfig::default())
    }

    /// Create a registry whose built-in strategies use the given configuration
    pub fn with_config(config: &SelectionConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(
            DefaultStrategy::NAME,
            DefaultStrategy::new(config.projects.clone()),
        );
        registry.register(
            TryOptionSyntaxStrategy::NAME,
            TryOptionSyntaxStrategy::with_config(&config.try_syntax),
        );
        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Register a strategy, replacing any previous one of the same name
    pub fn register<S: TargetTasksMethod + 'static>(&mut self, name: impl Into<String>, strategy: S) {
        let name = name.into();
        let replaced = self.strategies.insert(name.clone(), Arc::new(strategy)).is_some();
        debug!(strategy = %name, replaced, "strategy registered");
    }

    /// Register a plain function or closure as a strategy
    pub fn register_fn<F>(&mut self, name: impl Into<String>, method: F)
    where
        F: Fn(&TaskGraph, &Parameters) -> Result<Vec<String>> + Send + Sync + 'static,
    {
        self.register(name, method);
    }

    /// Get strategy by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn TargetTasksMethod>> {
        let result = self.strategies.get(name).cloned();
        debug!(
            strategy = name,
            found = result.is_some(),
            "strategy registry lookup"
        );
        result.ok_or_else(|| TargetTasksError::UnknownStrategy(name.to_string()).into())
    }

    /// Check whether a strategy is registered
    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Get strategy names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Look up a strategy and run it
    #[instrument(skip(self, task_graph, parameters))]
    pub fn select(
        &self,
        name: &str,
        task_graph: &TaskGraph,
        parameters: &Parameters,
    ) -> Result<Vec<String>> {
        let strategy = self.get(name)?;
        let selected = strategy.select(task_graph, parameters)?;
        info!(count = selected.len(), "target tasks computed");
        Ok(selected)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use taskgraph_core::config::ProjectSets;
    use taskgraph_core::error::TaskgraphError;
    use taskgraph_tasks::Task;

    fn sample_graph() -> TaskGraph {
        let tasks = vec![
            Task::new("a").with_attribute("run_on_projects", vec!["all"]),
            Task::new("b").with_attribute("run_on_projects", vec!["release"]),
            Task::new("c"),
        ];
        let edges = BTreeSet::from([("b".to_string(), "a".to_string())]);
        TaskGraph::from_tasks(tasks, edges).unwrap()
    }

    #[test]
    fn test_empty_registry() {
        let registry = StrategyRegistry::empty();
        assert!(registry.names().is_empty());
        assert!(!registry.contains("default"));
        assert!(registry.get("default").is_err());
    }

    #[test]
    fn test_builtin_strategies() {
        let registry = StrategyRegistry::new();
        assert_eq!(registry.names(), vec!["default", "try_option_syntax"]);
        assert!(registry.get("default").is_ok());
        assert!(registry.get("try_option_syntax").is_ok());
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = StrategyRegistry::new();
        let err = registry.get("all_the_things").err().unwrap();
        assert!(matches!(
            err,
            TaskgraphError::TargetTasks(TargetTasksError::UnknownStrategy(ref name)) if name == "all_the_things"
        ));
        assert_eq!(
            err.to_string(),
            "Unknown target tasks strategy 'all_the_things'"
        );
    }

    #[test]
    fn test_registered_closure_behaves_like_original() {
        fn every_other(graph: &TaskGraph, _params: &Parameters) -> Result<Vec<String>> {
            Ok(graph
                .iter()
                .step_by(2)
                .map(|task| task.label.clone())
                .collect())
        }

        let mut registry = StrategyRegistry::empty();
        registry.register_fn("every_other", every_other);

        let graph = sample_graph();
        let params = Parameters::new();
        let method = registry.get("every_other").unwrap();
        assert_eq!(
            method.select(&graph, &params).unwrap(),
            every_other(&graph, &params).unwrap()
        );
        assert_eq!(
            registry.select("every_other", &graph, &params).unwrap(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = StrategyRegistry::new();
        registry.register_fn("default", |_graph, _params| Ok(vec!["c".to_string()]));

        let params = Parameters::new().with_project("mozilla-central");
        assert_eq!(
            registry.select("default", &sample_graph(), &params).unwrap(),
            vec!["c"]
        );
        assert_eq!(registry.names().len(), 2);
    }

    #[test]
    fn test_default_through_registry() {
        let registry = StrategyRegistry::new();
        let params = Parameters::new().with_project("mozilla-central");
        assert_eq!(
            registry.select("default", &sample_graph(), &params).unwrap(),
            vec!["a", "b"]
        );

        let params = Parameters::new().with_project("baobab");
        assert_eq!(
            registry.select("default", &sample_graph(), &params).unwrap(),
            vec!["a"]
        );
    }

    #[test]
    fn test_with_config() {
        let mut config = SelectionConfig::default();
        config.projects = ProjectSets::new(Vec::<String>::new(), ["baobab"]);

        let registry = StrategyRegistry::with_config(&config);
        let params = Parameters::new().with_project("baobab");
        assert_eq!(
            registry.select("default", &sample_graph(), &params).unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_try_through_registry() {
        let registry = StrategyRegistry::new();
        let params = Parameters::new().with_message("no try syntax here");
        assert!(registry
            .select("try_option_syntax", &sample_graph(), &params)
            .unwrap()
            .is_empty());
    }
}
