//! Terminal rendering shared by the commands
//!
//! Selections go to stdout so they can be piped; status lines about the run
//! itself go to stderr.

use std::fmt::Display;

use console::{style, Style};

/// Report that a command finished
pub fn success(message: impl Display) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Report a failure
pub fn error(message: impl Display) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Report something suspicious that did not stop the command
pub fn warning(message: impl Display) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Section heading
pub fn header(text: &str) -> String {
    style(text).bold().underlined().to_string()
}

/// Indented `key: value` line
pub fn key_value(key: &str, value: impl Display) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for task labels and strategy names
pub fn label_style() -> Style {
    Style::new().cyan()
}

/// Style for file paths
pub fn path_style() -> Style {
    Style::new().magenta()
}

/// One selected task, with its run count when it runs more than once
pub fn task_line(label: &str, runs: u32) -> String {
    let label = label_style().apply_to(label);
    if runs > 1 {
        format!("  {} {}", label, style(format!("x{}", runs)).dim())
    } else {
        format!("  {}", label)
    }
}

/// Comma-separated list, or `-` when empty
pub fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let joined = items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}
