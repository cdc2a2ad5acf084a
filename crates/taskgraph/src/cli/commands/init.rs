//! Init command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use taskgraph_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use taskgraph_core::config::SelectionConfig;

use crate::cli::output;
use crate::cli::Cli;

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.toml {
            DEFAULT_CONFIG_TOML
        } else {
            DEFAULT_CONFIG_YAML
        };
        let config_path = self.output.clone().unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, self.render()?)?;

        if !cli.quiet {
            output::success(&format!(
                "Created {}",
                output::path_style().apply_to(config_path.display())
            ));
        }
        Ok(())
    }

    /// Default configuration in the requested format
    fn render(&self) -> anyhow::Result<String> {
        if self.toml {
            Ok(toml::to_string_pretty(&SelectionConfig::default())?)
        } else {
            Ok(DEFAULT_CONFIG_TEMPLATE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(toml: bool) -> InitCommand {
        InitCommand {
            force: false,
            toml,
            output: None,
        }
    }

    #[test]
    fn test_render_yaml() {
        let content = command(false).render().unwrap();
        let config: SelectionConfig = serde_yaml::from_str(&content).unwrap();
        assert_eq!(config, SelectionConfig::default());
    }

    #[test]
    fn test_render_toml() {
        let content = command(true).render().unwrap();
        let config: SelectionConfig = toml::from_str(&content).unwrap();
        assert_eq!(config, SelectionConfig::default());
    }
}
