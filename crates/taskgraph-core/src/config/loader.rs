//! Configuration discovery and loading
//!
//! A checkout keeps its selection config either at its top level or under
//! `taskcluster/`, next to the task definitions. Discovery starts in the
//! working directory and climbs towards the filesystem root; the first level
//! holding a config wins.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::{CONFIG_FILE_NAMES, TASKCLUSTER_DIR};
use super::types::SelectionConfig;
use super::validation::validate_config;

/// Serialization format of a config or parameters file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    /// Format implied by the file extension; unknown extensions read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    /// Deserialize `content` in this format
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        let value = match self {
            Self::Json => serde_json::from_str(content).map_err(ConfigError::JsonError)?,
            Self::Yaml => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
            Self::Toml => toml::from_str(content).map_err(ConfigError::TomlError)?,
        };
        Ok(value)
    }

    /// Read and deserialize a file
    pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_path(path).parse(&content)
    }
}

/// Load and validate a selection config file
pub fn load_config(path: &Path) -> Result<SelectionConfig> {
    info!(path = %path.display(), format = ?FileFormat::from_path(path), "loading selection config");

    let config: SelectionConfig = FileFormat::read(path)?;
    validate_config(&config)?;

    debug!(
        integration = config.projects.integration.len(),
        release = config.projects.release.len(),
        marker = %config.try_syntax.marker,
        "selection config loaded"
    );
    Ok(config)
}

/// Find the nearest selection config, starting at `start_dir`
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let found = start_dir.ancestors().find_map(config_at_level);
    match &found {
        Some(path) => info!(path = %path.display(), "found selection config"),
        None => debug!(start_dir = %start_dir.display(), "no selection config found"),
    }
    found
}

/// Config in `dir` itself, else in `dir/taskcluster`
fn config_at_level(dir: &Path) -> Option<PathBuf> {
    let nested = dir.join(TASKCLUSTER_DIR);
    let found = [dir, nested.as_path()]
        .into_iter()
        .flat_map(|base| CONFIG_FILE_NAMES.iter().map(move |name| base.join(name)))
        .find(|candidate| candidate.is_file());
    found
}

/// Load the nearest config, or the defaults when there is none.
///
/// A config that exists but does not parse or validate is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<(SelectionConfig, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => {
            debug!(dir = %dir.display(), "using default selection config");
            Ok((SelectionConfig::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_file_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("parameters.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("taskgraph.toml")), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("taskgraph.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("parameters")), FileFormat::Yaml);
    }

    #[test]
    fn test_taskcluster_dir_config() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "taskcluster/taskgraph.toml", "[projects]\nrelease = [\"mozilla-central\"]\n");

        assert_eq!(find_config(temp.path()), Some(path));
    }

    #[test]
    fn test_top_level_config_preferred() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "taskcluster/taskgraph.yaml", "{}\n");
        let top = write(temp.path(), ".taskgraph.toml", "");

        assert_eq!(find_config(temp.path()), Some(top));
    }

    #[test]
    fn test_nearest_level_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "taskgraph.yaml", "{}\n");
        let inner = write(temp.path(), "comm/taskcluster/taskgraph.yaml", "{}\n");
        let sub = temp.path().join("comm").join("mail").join("base");
        std::fs::create_dir_all(&sub).unwrap();

        assert_eq!(find_config(&sub), Some(inner));
    }

    #[test]
    fn test_directory_named_like_config_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("taskgraph.yaml")).unwrap();
        let path = write(temp.path(), "taskcluster/taskgraph.yaml", "{}\n");

        assert_eq!(find_config(temp.path()), Some(path));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "taskgraph.toml",
            "[projects]\nintegration = [\"fx-team\"]\n\n[try_syntax]\nmarker = \"try:\"\n",
        );

        let config = load_config(&path).unwrap();
        assert!(config.projects.is_integration("fx-team"));
        assert!(!config.projects.is_integration("mozilla-inbound"));
        assert!(config.projects.is_release("mozilla-central"));
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "taskgraph.yaml",
            "projects:\n  release: [mozilla-beta]\ntry_syntax:\n  ridealong_builds: {}\n",
        );

        let config = load_config(&path).unwrap();
        assert!(config.projects.is_release("mozilla-beta"));
        assert!(!config.projects.is_release("mozilla-central"));
        assert!(config.try_syntax.ridealong_builds.is_empty());
    }

    #[test]
    fn test_load_invalid_config_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "taskgraph.yaml", "try_syntax:\n  marker: \"\"\n");

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config, SelectionConfig::default());
    }

    #[test]
    fn test_broken_config_is_not_replaced_by_defaults() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "taskgraph.yaml", "projects: [not, a, map]\n");

        assert!(load_config_or_default(temp.path()).is_err());
    }
}
