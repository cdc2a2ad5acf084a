//! Immutable directed graph over task labels

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use crate::error::GraphError;

/// Direction to follow edges in when walking the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow edges from their source to their target
    Outgoing,
    /// Follow edges from their target back to their source
    Incoming,
}

/// A directed graph of labelled nodes.
///
/// Edges are ordered `(from, to)` pairs. Whether an edge means "depends on"
/// or "required by" is a convention owned by whoever builds the graph.
/// Cycles are allowed; nothing here relies on acyclicity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    nodes: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl Graph {
    /// Build a graph from a complete node and edge set.
    ///
    /// Fails if any edge endpoint is not a member of `nodes`.
    pub fn new(
        nodes: BTreeSet<String>,
        edges: BTreeSet<(String, String)>,
    ) -> Result<Self, GraphError> {
        for (from, to) in &edges {
            for endpoint in [from, to] {
                if !nodes.contains(endpoint) {
                    return Err(GraphError::InvalidGraph {
                        from: from.clone(),
                        to: to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    /// Build an edgeless graph from a set of labels
    pub fn from_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: BTreeSet::new(),
        }
    }

    /// All nodes, in sorted order
    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    /// All edges, in sorted order
    pub fn edges(&self) -> &BTreeSet<(String, String)> {
        &self.edges
    }

    /// Check whether a node is part of the graph
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adjacency map following edges in the given direction.
    ///
    /// Every node has an entry, possibly empty.
    pub fn links(&self, direction: Direction) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut links: BTreeMap<&str, BTreeSet<&str>> = self
            .nodes
            .iter()
            .map(|n| (n.as_str(), BTreeSet::new()))
            .collect();

        for (from, to) in &self.edges {
            let (src, dst) = match direction {
                Direction::Outgoing => (from.as_str(), to.as_str()),
                Direction::Incoming => (to.as_str(), from.as_str()),
            };
            links.entry(src).or_default().insert(dst);
        }

        links
    }

    /// All nodes transitively reachable from `start` following edges in
    /// `direction`.
    ///
    /// The start node is only included when a cycle leads back to it.
    /// Unknown start nodes reach nothing.
    pub fn reachable_from(&self, start: &str, direction: Direction) -> BTreeSet<String> {
        let links = self.links(direction);
        let mut reached: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if let Some(next) = links.get(current) {
                for &node in next {
                    if reached.insert(node.to_string()) {
                        queue.push_back(node);
                    }
                }
            }
        }

        reached
    }
}
