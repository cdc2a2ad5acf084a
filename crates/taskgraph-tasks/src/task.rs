//! Task records

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of a task attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean flag
    Bool(bool),
    /// Integer (e.g. a chunk number)
    Integer(i64),
    /// Single string
    String(String),
    /// Ordered list of strings (e.g. `run_on_projects`)
    List(Vec<String>),
}

impl AttributeValue {
    /// Get the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    ///
    /// Strings holding a decimal number are accepted too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get the value as a list of strings, if it is one
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::String(s) => write!(f, "{}", s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// A single schedulable unit of work.
///
/// Tasks are built once by graph generation and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Label, unique within a task graph
    pub label: String,

    /// Category tag (e.g. "build", "test")
    #[serde(default)]
    pub kind: Option<String>,

    /// Policy-defined metadata
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,

    /// Opaque payload, never interpreted during selection
    #[serde(default)]
    pub task: Value,
}

impl Task {
    /// Create a new task with no kind, attributes or payload
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
            attributes: BTreeMap::new(),
            task: Value::Null,
        }
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the payload
    pub fn with_payload(mut self, task: Value) -> Self {
        self.task = task;
        self
    }

    /// Get the kind, if any
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Get an attribute
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Check whether an attribute is present, whatever its value
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Get a string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(AttributeValue::as_str)
    }

    /// Get a list attribute
    pub fn attr_list(&self, key: &str) -> Option<&[String]> {
        self.attribute(key).and_then(AttributeValue::as_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("build-linux64/opt")
            .with_kind("build")
            .with_attribute("build_platform", "linux64")
            .with_attribute("run_on_projects", vec!["all"])
            .with_payload(serde_json::json!({"image": "desktop-build"}));

        assert_eq!(task.kind(), Some("build"));
        assert_eq!(task.attr_str("build_platform"), Some("linux64"));
        assert_eq!(task.attr_list("run_on_projects"), Some(&["all".to_string()][..]));
        assert!(task.has_attribute("run_on_projects"));
        assert!(!task.has_attribute("test_chunk"));
    }

    #[test]
    fn test_attribute_accessors() {
        assert_eq!(AttributeValue::from(3i64).as_i64(), Some(3));
        assert_eq!(AttributeValue::from("3").as_i64(), Some(3));
        assert_eq!(AttributeValue::from(true).as_bool(), Some(true));
        assert_eq!(AttributeValue::from("yep").as_bool(), None);
        assert_eq!(AttributeValue::from(vec!["a", "b"]).to_string(), "[a, b]");
    }

    #[test]
    fn test_task_deserialize() {
        let json = r#"{
            "label": "test-linux64/debug-mochitest-1",
            "kind": "test",
            "attributes": {
                "unittest_try_name": "mochitest",
                "test_chunk": 1,
                "e10s": false,
                "run_on_projects": ["all"]
            },
            "task": {"payload": {}}
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.attr_str("unittest_try_name"), Some("mochitest"));
        assert_eq!(task.attribute("test_chunk"), Some(&AttributeValue::Integer(1)));
        assert_eq!(task.attribute("e10s"), Some(&AttributeValue::Bool(false)));
        assert_eq!(task.attr_list("run_on_projects").map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_task_deserialize_minimal() {
        let task: Task = serde_json::from_str(r#"{"label": "a"}"#).unwrap();
        assert_eq!(task.kind(), None);
        assert!(task.attributes.is_empty());
        assert_eq!(task.task, Value::Null);
    }
}
