//! Taskgraph Tasks - Task records and the task graph
//!
//! This crate pairs the immutable [`Graph`](taskgraph_core::Graph) with the
//! task records produced by graph generation.

pub mod task;
pub mod taskgraph;

pub use task::{AttributeValue, Task};
pub use taskgraph::TaskGraph;
