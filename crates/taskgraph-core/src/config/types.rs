//! Configuration types

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::defaults;

/// Main configuration for target task selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Branch membership tables used by the default strategy
    pub projects: ProjectSets,

    /// Try-syntax conventions
    pub try_syntax: TrySyntaxConfig,
}

/// Which projects belong to the "integration" and "release" classes.
///
/// The two classes are independent: a project may be in neither, either,
/// or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSets {
    /// Integration branches (e.g. `mozilla-inbound`)
    pub integration: BTreeSet<String>,

    /// Release branches (e.g. `mozilla-central`)
    pub release: BTreeSet<String>,
}

impl ProjectSets {
    /// Create project sets from explicit lists
    pub fn new<I, R, S, T>(integration: I, release: R) -> Self
    where
        I: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            integration: integration.into_iter().map(Into::into).collect(),
            release: release.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a project is an integration branch
    pub fn is_integration(&self, project: &str) -> bool {
        self.integration.contains(project)
    }

    /// Check if a project is a release branch
    pub fn is_release(&self, project: &str) -> bool {
        self.release.contains(project)
    }
}

impl Default for ProjectSets {
    fn default() -> Self {
        Self::new(defaults::integration_projects(), defaults::release_projects())
    }
}

/// Try-syntax configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrySyntaxConfig {
    /// Marker that introduces try syntax in a push message
    pub marker: String,

    /// Task kinds matched as builds
    pub build_kinds: Vec<String>,

    /// Task kinds matched as tests
    pub test_kinds: Vec<String>,

    /// Task kinds matched as standalone jobs
    pub job_kinds: Vec<String>,

    /// Extra platforms selected whenever the key platform is selected
    pub ridealong_builds: BTreeMap<String, Vec<String>>,

    /// Display names usable inside `[...]` test filters, mapped to test platforms
    pub test_platform_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for TrySyntaxConfig {
    fn default() -> Self {
        Self {
            marker: defaults::DEFAULT_TRY_MARKER.to_string(),
            build_kinds: defaults::build_kinds(),
            test_kinds: defaults::test_kinds(),
            job_kinds: defaults::job_kinds(),
            ridealong_builds: defaults::ridealong_builds(),
            test_platform_aliases: defaults::test_platform_aliases(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_sets() {
        let sets = ProjectSets::default();
        assert!(sets.is_integration("mozilla-inbound"));
        assert!(sets.is_release("mozilla-central"));
        assert!(!sets.is_integration("mozilla-central"));
        assert!(!sets.is_release("baobab"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: SelectionConfig =
            serde_yaml::from_str("projects:\n  integration: [fx-team]\n").unwrap();

        assert!(config.projects.is_integration("fx-team"));
        assert!(!config.projects.is_integration("mozilla-inbound"));
        // release falls back to defaults
        assert!(config.projects.is_release("mozilla-central"));
        assert_eq!(config.try_syntax.marker, "try:");
    }
}
