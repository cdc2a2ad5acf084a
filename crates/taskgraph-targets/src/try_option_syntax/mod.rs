//! Try syntax: developer-authored requests for an ad-hoc set of tasks
//!
//! A push message such as
//!
//! ```text
//! Bug 1234 - frob the widget; try: -b do -p linux64,win32 -u mochitest-1,xpcshell --rebuild 3
//! ```
//!
//! is parsed into a [`TryOptionSyntax`] request. The request is plain data;
//! [`task_matches`] decides, one task at a time, whether the request selects
//! that task.

mod aliases;
mod matcher;
mod parser;
mod tokenizer;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;

use taskgraph_core::config::TrySyntaxConfig;
use taskgraph_tasks::Task;

pub use aliases::{resolve_talos, resolve_unittest, unittest_alias, SuitePattern};
pub use matcher::{task_duplicates, task_matches};
pub use parser::TrySyntaxParser;
pub use tokenizer::{split_list, split_try_message, tokenize};

/// Build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Debug build
    Debug,
    /// Optimized build
    Opt,
}

impl BuildType {
    /// Parse a `build_type` attribute value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Self::Debug),
            "opt" => Some(Self::Opt),
            _ => None,
        }
    }

    /// Attribute value for this build type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Opt => "opt",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Either every item, or only the listed ones (possibly none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T> {
    /// Wildcard
    All,
    /// Only these items; empty means nothing is selected
    Only(Vec<T>),
}

impl<T> Selection<T> {
    /// A selection that matches nothing
    pub fn none() -> Self {
        Self::Only(Vec::new())
    }

    /// Check for the wildcard
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Check for the empty selection
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Only(items) if items.is_empty())
    }

    /// The listed items, or `None` for the wildcard
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::All => None,
            Self::Only(items) => Some(items),
        }
    }
}

/// One requested test suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSpec {
    /// Suite name as written, without chunk suffix or platform filter
    pub name: String,
    /// Pattern the suite name resolved to
    pub pattern: SuitePattern,
    /// Full tokens whose chunk suffix was stripped, matched verbatim too
    pub literals: Vec<String>,
    /// Restrict to these test platforms (`[...]` filter)
    pub platforms: Option<Vec<String>>,
    /// Restrict to these chunks (`-N` suffix)
    pub only_chunks: Option<BTreeSet<i64>>,
}

impl TestSpec {
    /// A suite request matching every chunk on every platform
    pub fn new(name: impl Into<String>, pattern: SuitePattern) -> Self {
        Self {
            name: name.into(),
            pattern,
            literals: Vec::new(),
            platforms: None,
            only_chunks: None,
        }
    }
}

/// Task kind naming convention the matcher relies on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskKinds {
    /// Kinds treated as builds
    pub build: HashSet<String>,
    /// Kinds treated as tests
    pub test: HashSet<String>,
    /// Kinds treated as standalone jobs
    pub job: HashSet<String>,
}

impl From<&TrySyntaxConfig> for TaskKinds {
    fn from(config: &TrySyntaxConfig) -> Self {
        Self {
            build: config.build_kinds.iter().cloned().collect(),
            test: config.test_kinds.iter().cloned().collect(),
            job: config.job_kinds.iter().cloned().collect(),
        }
    }
}

impl Default for TaskKinds {
    fn default() -> Self {
        Self::from(&TrySyntaxConfig::default())
    }
}

/// A parsed try-syntax request.
///
/// Built once per selection from the push message and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TryOptionSyntax {
    /// Selected build variants
    pub build_types: Vec<BuildType>,
    /// Selected build platforms
    pub platforms: Selection<String>,
    /// Selected unittest suites
    pub unittests: Selection<TestSpec>,
    /// Selected talos suites
    pub talos: Selection<TestSpec>,
    /// Selected standalone jobs
    pub jobs: Selection<String>,
    /// Times to run each selected unittest task
    pub trigger_tests: u32,
    /// Times to run each selected talos task
    pub talos_trigger_tests: u32,
    /// Who to notify on completion
    pub notifications: Option<String>,
    /// `KEY=VALUE` pairs to inject into task environments
    pub env: Vec<String>,
    /// Collect a performance profile
    pub profile: bool,
    /// Restrict tests to those carrying this tag
    pub tag: Option<String>,
    /// Disable automatic retry of failures
    pub no_retry: bool,
    /// Make tasks interactive
    pub interactive: bool,
    /// Kind convention used when matching tasks
    #[serde(skip)]
    pub kinds: TaskKinds,
}

impl TryOptionSyntax {
    /// Parse a push message with the default configuration
    pub fn parse(message: &str) -> Self {
        TrySyntaxParser::default().parse(message)
    }

    /// A request that matches nothing
    pub fn empty(kinds: TaskKinds) -> Self {
        Self {
            build_types: Vec::new(),
            platforms: Selection::none(),
            unittests: Selection::none(),
            talos: Selection::none(),
            jobs: Selection::none(),
            trigger_tests: 0,
            talos_trigger_tests: 0,
            notifications: None,
            env: Vec::new(),
            profile: false,
            tag: None,
            no_retry: false,
            interactive: false,
            kinds,
        }
    }

    /// Check whether this request selects a task
    pub fn task_matches(&self, task: &Task) -> bool {
        task_matches(self, task)
    }

    /// How many times a selected task should run
    pub fn task_duplicates(&self, task: &Task) -> u32 {
        task_duplicates(self, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_type_parse() {
        assert_eq!(BuildType::parse("debug"), Some(BuildType::Debug));
        assert_eq!(BuildType::parse("opt"), Some(BuildType::Opt));
        assert_eq!(BuildType::parse("pgo"), None);
        assert_eq!(BuildType::Opt.to_string(), "opt");
    }

    #[test]
    fn test_selection_helpers() {
        let all: Selection<String> = Selection::All;
        assert!(all.is_all());
        assert!(!all.is_none());
        assert!(all.items().is_none());

        let none: Selection<String> = Selection::none();
        assert!(none.is_none());
        assert_eq!(none.items(), Some(&[][..]));
    }

    #[test]
    fn test_empty_request() {
        let options = TryOptionSyntax::empty(TaskKinds::default());
        assert!(options.build_types.is_empty());
        assert!(options.platforms.is_none());
        assert!(options.jobs.is_none());
        assert_eq!(options.trigger_tests, 0);
        assert!(!options.profile);
    }

    #[test]
    fn test_default_kinds() {
        let kinds = TaskKinds::default();
        assert!(kinds.build.contains("build"));
        assert!(kinds.test.contains("desktop-test"));
        assert!(kinds.job.contains("source-check"));
    }

    #[test]
    fn test_serialize_request() {
        let options = TryOptionSyntax::parse("try: -b o -p macosx64 --rebuild 2");
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["build_types"], serde_json::json!(["opt"]));
        assert_eq!(json["platforms"], serde_json::json!({"only": ["macosx64"]}));
        assert_eq!(json["trigger_tests"], 2);
    }
}
