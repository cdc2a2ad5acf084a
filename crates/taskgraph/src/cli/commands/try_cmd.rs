//! Try command

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use taskgraph_targets::{TryOptionSyntax, TrySyntaxParser};
use taskgraph_tasks::TaskGraph;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Parse a try-syntax message and show what it requests
#[derive(Debug, Args)]
pub struct TryCommand {
    /// Push message containing try syntax
    pub message: String,

    /// Also list the tasks of this task graph the message selects
    #[arg(short, long)]
    pub graph: Option<PathBuf>,
}

/// A selected task and how many times it should run
#[derive(Debug, PartialEq, Eq, Serialize)]
struct Scheduled {
    label: String,
    runs: u32,
}

impl TryCommand {
    /// Execute the try command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(graph = ?self.graph, "executing try command");
        let cwd = std::env::current_dir()?;
        let (config, _) = cli.load_config(&cwd)?;

        let options = TrySyntaxParser::with_config(&config.try_syntax).parse(&self.message);

        let scheduled = match &self.graph {
            Some(path) => Some(scheduled_tasks(&options, &TaskGraph::load(path)?)),
            None => None,
        };

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "options": options,
                    "tasks": scheduled,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", output::header("Try options"));
                print!("{}", serde_yaml::to_string(&options)?);

                if let Some(scheduled) = scheduled {
                    println!();
                    println!("{}", output::header("Tasks"));
                    for task in &scheduled {
                        println!("{}", output::task_line(&task.label, task.runs));
                    }
                    if scheduled.is_empty() && !cli.quiet {
                        output::warning("no tasks selected");
                    }
                }
            }
        }

        Ok(())
    }
}

/// Tasks the request selects, in graph order, with their run counts
fn scheduled_tasks(options: &TryOptionSyntax, task_graph: &TaskGraph) -> Vec<Scheduled> {
    task_graph
        .iter()
        .filter(|task| options.task_matches(task))
        .map(|task| Scheduled {
            label: task.label.clone(),
            runs: options.task_duplicates(task),
        })
        .collect()
}
