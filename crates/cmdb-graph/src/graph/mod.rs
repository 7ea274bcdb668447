//! Dependency graph construction using petgraph.
//!
//! # Edge Direction Convention
//!
//! Edges point **downstream**, from the node a status originates at to the
//! node that depends on it:
//!
//! - **Edge source**: the upstream node (the dependency)
//! - **Edge target**: the downstream node (the dependent)
//!
//! So for a node `n`, outgoing neighbours are its `dependents` and incoming
//! neighbours are its `dependencies`. Status propagation only ever follows
//! outgoing edges.
//!
//! The graph is rebuilt from a snapshot for every computation pass and is
//! never mutated afterwards.

pub mod reachability;

use crate::domain::{Connection, GroupConnection, NodeKey};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Stable identifier of a logical edge, derived from its endpoint keys only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Build the identifier for the edge `source -> target`.
    #[must_use]
    pub fn new(source: NodeKey, target: NodeKey) -> Self {
        Self(format!("e{source}-{target}"))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Upstream endpoint
    pub source: NodeKey,
    /// Downstream endpoint
    pub target: NodeKey,
}

impl Edge {
    /// Create an edge.
    pub fn new(source: NodeKey, target: NodeKey) -> Self {
        Self { source, target }
    }

    /// Stable identifier of this edge.
    #[must_use]
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.source, self.target)
    }
}

/// Resolve every declared connection to an [`Edge`].
///
/// Item/group connections come first, then group -> group connections, each
/// in declaration order. Malformed connections are skipped and a repeated
/// `(source, target)` pair is kept only once.
pub fn resolve_edges(
    connections: &[Connection],
    group_connections: &[GroupConnection],
) -> Vec<Edge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::with_capacity(connections.len() + group_connections.len());

    let declared = connections
        .iter()
        .filter_map(|connection| match connection.endpoints() {
            Ok(endpoints) => Some(endpoints),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping connection");
                None
            }
        })
        .chain(group_connections.iter().map(GroupConnection::endpoints));

    for (source, target) in declared {
        let edge = Edge::new(source, target);
        if seen.insert(edge) {
            edges.push(edge);
        }
    }

    edges
}

/// Adjacency model of one snapshot's declared edges.
///
/// Only nodes that appear in at least one edge are present.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes contain `NodeKey` values; edges carry no weight.
    graph: DiGraph<NodeKey, ()>,

    /// Mapping from `NodeKey` to graph `NodeIndex`.
    node_map: HashMap<NodeKey, NodeIndex>,

    /// Edges in insertion order.
    edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Build the graph from raw connection records.
    pub fn build(connections: &[Connection], group_connections: &[GroupConnection]) -> Self {
        Self::from_edges(resolve_edges(connections, group_connections))
    }

    /// Build the graph from already resolved edges.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut built = Self::default();
        for edge in edges {
            built.insert_edge(edge);
        }
        tracing::trace!(
            nodes = built.node_count(),
            edges = built.edge_count(),
            "Built dependency graph"
        );
        built
    }

    fn node_index(&mut self, key: NodeKey) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&key) {
            return index;
        }
        let index = self.graph.add_node(key);
        self.node_map.insert(key, index);
        index
    }

    fn insert_edge(&mut self, edge: Edge) {
        let source = self.node_index(edge.source);
        let target = self.node_index(edge.target);
        if self.graph.find_edge(source, target).is_none() {
            self.graph.add_edge(source, target, ());
            self.edges.push(edge);
        }
    }

    /// Whether `key` takes part in any edge.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        self.node_map.contains_key(&key)
    }

    /// Downstream neighbours of `key` (nodes its edges terminate at).
    #[must_use]
    pub fn dependents(&self, key: NodeKey) -> BTreeSet<NodeKey> {
        self.neighbors(key, Direction::Outgoing)
    }

    /// Upstream neighbours of `key` (nodes whose edges terminate at it).
    #[must_use]
    pub fn dependencies(&self, key: NodeKey) -> BTreeSet<NodeKey> {
        self.neighbors(key, Direction::Incoming)
    }

    fn neighbors(&self, key: NodeKey, direction: Direction) -> BTreeSet<NodeKey> {
        // Unknown keys have no neighbours
        let Some(&node) = self.node_map.get(&key) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(node, direction)
            .map(|neighbor| self.graph[neighbor])
            .collect()
    }

    /// All edges, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
