//! Strategies command

use clap::Args;
use serde::Serialize;
use tracing::info;

use taskgraph_core::config::SelectionConfig;
use taskgraph_targets::{DefaultStrategy, StrategyRegistry, TryOptionSyntaxStrategy};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// List available selection strategies
#[derive(Debug, Args)]
pub struct StrategiesCommand {}

/// A registered strategy and the settings it runs with
#[derive(Debug, PartialEq, Eq, Serialize)]
struct StrategyInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<String>,
}

impl StrategiesCommand {
    /// Execute the strategies command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing strategies command");
        let cwd = std::env::current_dir()?;
        let (config, config_path) = cli.load_config(&cwd)?;
        let strategies = describe(&config);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&strategies)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Strategies"));
                    if let Some(path) = &config_path {
                        println!("{}", output::key_value("config", output::path_style().apply_to(path.display())));
                    }
                }
                for strategy in &strategies {
                    match &strategy.settings {
                        Some(settings) => println!(
                            "  {} {}",
                            output::label_style().apply_to(&strategy.name),
                            console::style(settings).dim()
                        ),
                        None => println!("  {}", output::label_style().apply_to(&strategy.name)),
                    }
                }
            }
        }

        Ok(())
    }
}

/// Strategies registered for `config`, in name order
fn describe(config: &SelectionConfig) -> Vec<StrategyInfo> {
    StrategyRegistry::with_config(config)
        .names()
        .into_iter()
        .map(|name| StrategyInfo {
            name: name.to_string(),
            settings: settings(name, config),
        })
        .collect()
}

fn settings(name: &str, config: &SelectionConfig) -> Option<String> {
    match name {
        DefaultStrategy::NAME => Some(format!(
            "integration: {}; release: {}",
            output::join(&config.projects.integration),
            output::join(&config.projects.release)
        )),
        TryOptionSyntaxStrategy::NAME => Some(format!("marker: {}", config.try_syntax.marker)),
        _ => None,
    }
}
