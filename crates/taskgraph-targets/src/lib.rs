//! Taskgraph Targets - Target task selection strategies
//!
//! This crate decides which tasks of a full task graph get scheduled for a
//! push: the project-based `default` strategy, the developer-driven
//! `try_option_syntax` strategy, and the registry that maps strategy names
//! to implementations.

mod default;
mod registry;
mod traits;
mod try_select;
pub mod try_option_syntax;

pub use default::{run_on_projects_matches, DefaultStrategy};
pub use registry::StrategyRegistry;
pub use traits::TargetTasksMethod;
pub use try_option_syntax::{TryOptionSyntax, TrySyntaxParser};
pub use try_select::{TryMatcher, TryOptionSyntaxStrategy};
