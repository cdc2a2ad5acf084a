//! Suite name aliases for `-u` and `-t`
//!
//! Developers write short names like `mochitest` or `reftest` and expect
//! every matching suite to run. An alias resolves to a pattern that is
//! matched against a task's try name at selection time.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// How a requested suite name is matched against a task's try name
#[derive(Debug, Clone)]
pub enum SuitePattern {
    /// Try name equals the string
    Exact(String),
    /// Try name starts with the string
    Prefix(String),
    /// Try name contains the string
    Contains(String),
    /// Try name matches the regex
    Matches(Regex),
}

impl SuitePattern {
    /// Check a task's try name against this pattern
    pub fn matches(&self, try_name: &str) -> bool {
        match self {
            Self::Exact(s) => try_name == s,
            Self::Prefix(s) => try_name.starts_with(s.as_str()),
            Self::Contains(s) => try_name.contains(s.as_str()),
            Self::Matches(re) => re.is_match(try_name),
        }
    }
}

impl PartialEq for SuitePattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b))
            | (Self::Prefix(a), Self::Prefix(b))
            | (Self::Contains(a), Self::Contains(b)) => a == b,
            (Self::Matches(a), Self::Matches(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for SuitePattern {}

impl fmt::Display for SuitePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "{}", s),
            Self::Prefix(s) => write!(f, "{}*", s),
            Self::Contains(s) => write!(f, "*{}*", s),
            Self::Matches(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl Serialize for SuitePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

static REFTEST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(plain-)?reftest.*$").expect("Invalid regex"));

static REFTEST_NO_ACCEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(plain-)?reftest-no-accel.*$").expect("Invalid regex"));

static REFTEST_E10S_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(plain-)?reftest-e10s.*$").expect("Invalid regex"));

fn prefix(s: &str) -> SuitePattern {
    SuitePattern::Prefix(s.to_string())
}

fn contains(s: &str) -> SuitePattern {
    SuitePattern::Contains(s.to_string())
}

/// Look up the alias for a unittest suite name
pub fn unittest_alias(name: &str) -> Option<SuitePattern> {
    let pattern = match name {
        "cppunit" => prefix("cppunit"),
        "crashtest" => prefix("crashtest"),
        "crashtest-e10s" => prefix("crashtest-e10s"),
        "e10s" => contains("e10s"),
        "firefox-ui-functional" => prefix("firefox-ui-functional"),
        "firefox-ui-functional-e10s" => prefix("firefox-ui-functional-e10s"),
        "gaia-js-integration" => contains("gaia-js-integration"),
        "gtest" => prefix("gtest"),
        "jittest" | "jittests" => prefix("jittest"),
        "jsreftest" => prefix("jsreftest"),
        "jsreftest-e10s" => prefix("jsreftest-e10s"),
        "marionette" => prefix("marionette"),
        "marionette-e10s" => prefix("marionette-e10s"),
        "mochitest" | "mochitests" => prefix("mochitest"),
        "mochitest-e10s" | "mochitests-e10s" => prefix("mochitest-e10s"),
        "mochitest-debug" => prefix("mochitest-debug-"),
        "mochitest-a11y" => contains("mochitest-a11y"),
        "mochitest-bc" | "mochitest-browser-chrome" => prefix("mochitest-browser-chrome"),
        "mochitest-e10s-bc" | "mochitest-e10s-browser-chrome" => {
            prefix("mochitest-e10s-browser-chrome")
        }
        "mochitest-chrome" => contains("mochitest-chrome"),
        "mochitest-dt" | "mochitest-devtools-chrome" => prefix("mochitest-devtools-chrome"),
        "mochitest-e10s-dt" => prefix("mochitest-e10s-devtools-chrome"),
        "mochitest-gl" => prefix("mochitest-webgl"),
        "mochitest-gl-e10s" => prefix("mochitest-webgl-e10s"),
        "mochitest-jetpack" => prefix("mochitest-jetpack"),
        "mochitest-media" => prefix("mochitest-media"),
        "mochitest-media-e10s" => prefix("mochitest-media-e10s"),
        "mochitest-vg" => prefix("mochitest-valgrind"),
        "reftest" | "reftests" => SuitePattern::Matches(REFTEST_REGEX.clone()),
        "reftest-no-accel" => SuitePattern::Matches(REFTEST_NO_ACCEL_REGEX.clone()),
        "reftests-e10s" | "reftest-e10s" => SuitePattern::Matches(REFTEST_E10S_REGEX.clone()),
        "robocop" => prefix("robocop"),
        "web-platform-test" | "web-platform-tests" => prefix("web-platform-tests"),
        "web-platform-tests-e10s" => prefix("web-platform-tests-e10s"),
        "web-platform-tests-reftests" => prefix("web-platform-tests-reftests"),
        "web-platform-tests-reftests-e10s" => prefix("web-platform-tests-reftests-e10s"),
        "xpcshell" => prefix("xpcshell"),
        _ => return None,
    };
    Some(pattern)
}

/// Resolve a unittest suite name, falling back to an exact match
pub fn resolve_unittest(name: &str) -> SuitePattern {
    unittest_alias(name).unwrap_or_else(|| SuitePattern::Exact(name.to_string()))
}

/// Resolve a talos suite name. Talos suites have no aliases.
pub fn resolve_talos(name: &str) -> SuitePattern {
    SuitePattern::Exact(name.to_string())
}
