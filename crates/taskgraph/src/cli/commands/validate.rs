//! Validate command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use taskgraph_core::config::{find_config, load_config, SelectionConfig};
use taskgraph_core::error::ConfigError;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Validate the configuration file
#[derive(Debug, Args)]
pub struct ValidateCommand {}

/// Where the configuration came from and whether it loaded
#[derive(Debug)]
struct Report {
    path: Option<PathBuf>,
    outcome: Result<SelectionConfig, String>,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing validate command");
        let cwd = std::env::current_dir()?;
        let report = check(cli.config.as_deref(), &cwd);

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": report.outcome.is_ok(),
                    "path": report.path.as_ref().map(|p| p.display().to_string()),
                    "error": report.outcome.as_ref().err(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => match (&report.outcome, &report.path) {
                (Err(e), _) => output::error(format!("Configuration: {}", e)),
                (Ok(config), Some(path)) if !cli.quiet => {
                    output::success(format!(
                        "Configuration is valid: {}",
                        output::path_style().apply_to(path.display())
                    ));
                    println!("{}", output::key_value("integration", output::join(&config.projects.integration)));
                    println!("{}", output::key_value("release", output::join(&config.projects.release)));
                    println!("{}", output::key_value("try marker", &config.try_syntax.marker));
                }
                _ => {}
            },
        }

        if let Err(e) = report.outcome {
            anyhow::bail!("configuration is invalid: {}", e);
        }
        Ok(())
    }
}

/// Locate and load the configuration: `explicit` if given, else the nearest
/// one above `dir`.
fn check(explicit: Option<&Path>, dir: &Path) -> Report {
    let path = explicit.map(Path::to_path_buf).or_else(|| find_config(dir));
    let Some(path) = path else {
        return Report {
            path: None,
            outcome: Err(ConfigError::NotFound(dir.to_path_buf()).to_string()),
        };
    };

    let outcome = load_config(&path).map_err(|e| e.to_string());
    Report {
        path: Some(path),
        outcome,
    }
}
