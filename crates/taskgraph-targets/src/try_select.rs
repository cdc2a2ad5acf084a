//! Try-syntax target task selection

use tracing::{debug, info, instrument};

use taskgraph_core::config::TrySyntaxConfig;
use taskgraph_core::error::Result;
use taskgraph_core::parameters::Parameters;
use taskgraph_tasks::{Task, TaskGraph};

use crate::traits::TargetTasksMethod;
use crate::try_option_syntax::{task_matches, TryOptionSyntax, TrySyntaxParser};

/// Predicate deciding whether a parsed request selects a task
pub type TryMatcher = fn(&TryOptionSyntax, &Task) -> bool;

/// Selects tasks requested by the try syntax in the push message
#[derive(Debug, Clone)]
pub struct TryOptionSyntaxStrategy {
    parser: TrySyntaxParser,
    matcher: TryMatcher,
}

impl TryOptionSyntaxStrategy {
    /// Registry name of this strategy
    pub const NAME: &'static str = "try_option_syntax";

    /// Create a strategy with the default parser and matcher
    pub fn new() -> Self {
        Self::with_config(&TrySyntaxConfig::default())
    }

    /// Create a strategy whose parser follows the given conventions
    pub fn with_config(config: &TrySyntaxConfig) -> Self {
        Self {
            parser: TrySyntaxParser::with_config(config),
            matcher: task_matches,
        }
    }

    /// Replace the predicate used to decide selection
    pub fn with_matcher(mut self, matcher: TryMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Parser used for push messages
    pub fn parser(&self) -> &TrySyntaxParser {
        &self.parser
    }
}

impl Default for TryOptionSyntaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetTasksMethod for TryOptionSyntaxStrategy {
    #[instrument(skip_all, fields(strategy = TryOptionSyntaxStrategy::NAME))]
    fn select(&self, task_graph: &TaskGraph, parameters: &Parameters) -> Result<Vec<String>> {
        let message = parameters.message()?;
        let options = self.parser.parse(message);
        debug!(?options, "parsed try options");

        let selected: Vec<String> = task_graph
            .iter()
            .filter(|task| (self.matcher)(&options, task))
            .map(|task| task.label.clone())
            .collect();

        info!(
            total = task_graph.len(),
            selected = selected.len(),
            "try target tasks selected"
        );
        Ok(selected)
    }
}
