//! Default configuration values

use std::collections::BTreeMap;

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "taskgraph.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "taskgraph.toml";

/// Marker that introduces try syntax in a push message
pub const DEFAULT_TRY_MARKER: &str = "try:";

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    DEFAULT_CONFIG_YAML,
    DEFAULT_CONFIG_TOML,
    ".taskgraph.yaml",
    ".taskgraph.toml",
];

/// Directory holding the task definitions, also searched for a config
pub const TASKCLUSTER_DIR: &str = "taskcluster";

/// Projects that count as integration branches
pub fn integration_projects() -> Vec<String> {
    to_strings(&["mozilla-inbound", "autoland"])
}

/// Projects that count as release branches
pub fn release_projects() -> Vec<String> {
    to_strings(&[
        "mozilla-central",
        "mozilla-aurora",
        "mozilla-beta",
        "mozilla-release",
        "mozilla-esr45",
    ])
}

/// Task kinds treated as builds by the try-syntax matcher
pub fn build_kinds() -> Vec<String> {
    to_strings(&[
        "build",
        "artifact-build",
        "hazard",
        "l10n",
        "valgrind",
        "static-analysis",
        "spidermonkey",
    ])
}

/// Task kinds treated as tests by the try-syntax matcher
pub fn test_kinds() -> Vec<String> {
    to_strings(&["test", "desktop-test", "android-test"])
}

/// Task kinds treated as standalone jobs by the try-syntax matcher
pub fn job_kinds() -> Vec<String> {
    to_strings(&[
        "source-check",
        "toolchain",
        "marionette-harness",
        "android-stuff",
    ])
}

/// Platforms that are implicitly added when another platform is requested
pub fn ridealong_builds() -> BTreeMap<String, Vec<String>> {
    let mut ridealong = BTreeMap::new();
    ridealong.insert("linux".to_string(), to_strings(&["linux-l10n"]));
    ridealong.insert("linux64".to_string(), to_strings(&["linux64-l10n"]));
    ridealong
}

/// Display names accepted in `[...]` test platform filters
pub fn test_platform_aliases() -> BTreeMap<String, Vec<String>> {
    [
        ("Linux", "linux32"),
        ("Linux x64", "linux64"),
        ("OS X 10.10", "macosx64"),
        ("Windows XP", "windowsxp"),
        ("Windows 7", "windows7-32"),
        ("Windows 8", "windows8-64"),
        ("Windows 10", "windows10-64"),
    ]
    .into_iter()
    .map(|(name, platform)| (name.to_string(), vec![platform.to_string()]))
    .collect()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Target task selection configuration

projects:
  integration:
    - mozilla-inbound
    - autoland
  release:
    - mozilla-central
    - mozilla-aurora
    - mozilla-beta
    - mozilla-release
    - mozilla-esr45

try_syntax:
  marker: "try:"
  ridealong_builds:
    linux: [linux-l10n]
    linux64: [linux64-l10n]
  test_platform_aliases:
    Linux: [linux32]
    Linux x64: [linux64]
    OS X 10.10: [macosx64]
    Windows XP: [windowsxp]
    Windows 7: [windows7-32]
    Windows 8: [windows8-64]
    Windows 10: [windows10-64]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SelectionConfig;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: SelectionConfig = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, SelectionConfig::default());
    }
}
