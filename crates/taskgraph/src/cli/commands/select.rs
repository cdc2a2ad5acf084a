//! Select command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use taskgraph_core::parameters::Parameters;
use taskgraph_targets::StrategyRegistry;
use taskgraph_tasks::TaskGraph;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Compute the target tasks of a task graph
#[derive(Debug, Args)]
pub struct SelectCommand {
    /// Full task graph (JSON)
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Selection strategy
    #[arg(short, long, default_value = "default")]
    pub strategy: String,

    /// Parameters file (JSON, YAML or TOML)
    #[arg(short, long)]
    pub parameters: Option<PathBuf>,

    /// Project the push was made to (overrides the parameters file)
    #[arg(long)]
    pub project: Option<String>,

    /// Push message (overrides the parameters file)
    #[arg(short, long)]
    pub message: Option<String>,
}

impl SelectCommand {
    /// Execute the select command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            strategy = %self.strategy,
            graph = %self.graph.display(),
            "executing select command"
        );
        let cwd = std::env::current_dir()?;
        let (config, _) = cli.load_config(&cwd)?;

        let task_graph = TaskGraph::load(&self.graph)?;
        let parameters = self.parameters()?;

        let registry = StrategyRegistry::with_config(&config);
        let target_tasks = registry.select(&self.strategy, &task_graph, &parameters)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "strategy": self.strategy,
                    "total": task_graph.len(),
                    "target_tasks": target_tasks,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                for label in &target_tasks {
                    println!("{}", label);
                }
                if !cli.quiet {
                    output::success(&format!(
                        "{} of {} tasks selected by '{}'",
                        target_tasks.len(),
                        task_graph.len(),
                        self.strategy
                    ));
                }
            }
        }

        Ok(())
    }

    /// Parameters from the file, with command-line overrides applied
    fn parameters(&self) -> anyhow::Result<Parameters> {
        let mut parameters = match &self.parameters {
            Some(path) => Parameters::load(path)?,
            None => Parameters::new(),
        };
        if let Some(project) = &self.project {
            parameters = parameters.with_project(project.as_str());
        }
        if let Some(message) = &self.message {
            parameters = parameters.with_message(message.as_str());
        }
        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn command(parameters: Option<PathBuf>) -> SelectCommand {
        SelectCommand {
            graph: PathBuf::from("full-task-graph.json"),
            strategy: "default".to_string(),
            parameters,
            project: None,
            message: None,
        }
    }

    #[test]
    fn test_parameters_from_flags() {
        let mut cmd = command(None);
        cmd.project = Some("mozilla-central".to_string());
        cmd.message = Some("try: -b o".to_string());

        let params = cmd.parameters().unwrap();
        assert_eq!(params.project().unwrap(), "mozilla-central");
        assert_eq!(params.message().unwrap(), "try: -b o");
    }

    #[test]
    fn test_flags_override_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("parameters.yml");
        std::fs::write(&path, "project: try\nmessage: 'try: -b d'\nlevel: '1'\n").unwrap();

        let mut cmd = command(Some(path));
        cmd.project = Some("autoland".to_string());

        let params = cmd.parameters().unwrap();
        assert_eq!(params.project().unwrap(), "autoland");
        assert_eq!(params.message().unwrap(), "try: -b d");
        assert_eq!(params.get_str("level").unwrap(), "1");
    }

    #[test]
    fn test_missing_parameters_file() {
        let cmd = command(Some(PathBuf::from("/nonexistent/parameters.yml")));
        assert!(cmd.parameters().is_err());
    }
}
