//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use taskgraph_core::config::{load_config, load_config_or_default, SelectionConfig};

use commands::{InitCommand, SelectCommand, StrategiesCommand, TryCommand, ValidateCommand};

/// Taskgraph - Decide which tasks run for a push
#[derive(Debug, Parser)]
#[command(name = "taskgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (searched for from the working directory if omitted)
    #[arg(short, long, global = true, env = "TASKGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitCommand),

    /// Compute the target tasks of a task graph
    Select(SelectCommand),

    /// Parse a try-syntax message and show what it requests
    Try(TryCommand),

    /// List available selection strategies
    Strategies(StrategiesCommand),

    /// Validate the configuration file
    Validate(ValidateCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Select(ref cmd) => cmd.execute(&self),
            Commands::Try(ref cmd) => cmd.execute(&self),
            Commands::Strategies(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or the nearest one
    /// found from `dir`, falling back to defaults.
    pub fn load_config(&self, dir: &Path) -> anyhow::Result<(SelectionConfig, Option<PathBuf>)> {
        match &self.config {
            Some(path) => Ok((load_config(path)?, Some(path.clone()))),
            None => Ok(load_config_or_default(dir)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_select() {
        let cli = Cli::try_parse_from([
            "taskgraph",
            "--format",
            "json",
            "select",
            "--graph",
            "full-task-graph.json",
            "--strategy",
            "try_option_syntax",
            "--message",
            "try: -b o -p linux64",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Select(cmd) => {
                assert_eq!(cmd.strategy, "try_option_syntax");
                assert_eq!(cmd.message.as_deref(), Some("try: -b o -p linux64"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_load_explicit_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "projects:\n  integration: [autoland]\n").unwrap();

        let cli = Cli::try_parse_from([
            "taskgraph",
            "--config",
            path.to_str().unwrap(),
            "strategies",
        ])
        .unwrap();

        let (config, found) = cli.load_config(temp.path()).unwrap();
        assert_eq!(found, Some(path));
        assert!(config.projects.is_integration("autoland"));
        assert!(!config.projects.is_integration("mozilla-inbound"));
    }
}
