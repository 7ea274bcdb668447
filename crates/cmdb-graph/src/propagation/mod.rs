//! Status propagation over a snapshot.
//!
//! One pass runs in four steps:
//!
//! 1. Resolve every node's intrinsic status ([`SnapshotIndex::resolve_status`])
//! 2. Collect the problematic nodes (status other than `active`)
//! 3. Expand each problematic node into its affected set, containment
//!    included, recording `(source, status)` contributions per affected node
//! 4. Annotate every declared edge from those contributions ([`annotate_edges`])
//!
//! Affected sets are computed per problematic source. Each pass is a pure
//! function of its snapshot; nothing is cached between passes.

mod annotate;
mod diff;
mod style;

pub use annotate::{EdgeAnnotations, PropagationResult, annotate_edges, annotate_snapshot};
pub use diff::{AnnotationDiff, diff_annotations};
pub use style::{EdgeStyle, Marker};

use crate::domain::{Connection, GroupConnection, NodeKey, Status};
use crate::graph::reachability::affected_nodes_with_containment;
use crate::graph::{DependencyGraph, Edge, resolve_edges};
use crate::severity::{Contribution, merge_severity, merge_statuses};
use crate::status::SnapshotIndex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Resolve declared edges, keeping only those whose endpoints both exist in
/// the snapshot. A node may have been deleted while its edges linger.
pub fn known_edges(
    index: &SnapshotIndex<'_>,
    connections: &[Connection],
    group_connections: &[GroupConnection],
) -> Vec<Edge> {
    resolve_edges(connections, group_connections)
        .into_iter()
        .filter(|edge| {
            let known = index.contains(edge.source) && index.contains(edge.target);
            if !known {
                tracing::debug!(
                    edge = %edge.id(),
                    "Skipping edge with an endpoint missing from the snapshot"
                );
            }
            known
        })
        .collect()
}

/// Everything known about one node after a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    /// The node
    pub key: NodeKey,
    /// Its own resolved status
    pub intrinsic_status: Status,
    /// Worst status reaching it from upstream, if any
    pub propagated_status: Option<Status>,
    /// Worst of the two
    pub effective_status: Status,
    /// Problematic sources reaching it
    pub affected_by: Vec<Contribution>,
}

/// Node-level outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Intrinsic status of every node in the snapshot.
    intrinsic: BTreeMap<NodeKey, Status>,

    /// Contributions per affected node, in source key order.
    affected: BTreeMap<NodeKey, Vec<Contribution>>,
}

impl Propagation {
    /// Run a pass over an indexed snapshot and its graph.
    ///
    /// The graph should only contain nodes present in `index`.
    pub fn compute(index: &SnapshotIndex<'_>, graph: &DependencyGraph) -> Self {
        let intrinsic: BTreeMap<NodeKey, Status> = index
            .node_keys()
            .into_iter()
            .filter_map(|key| index.resolve_status(key).ok().map(|status| (key, status)))
            .collect();

        let mut affected: BTreeMap<NodeKey, Vec<Contribution>> = BTreeMap::new();
        let mut problematic = 0usize;

        for (&source, &status) in &intrinsic {
            if !status.is_problematic() {
                continue;
            }
            problematic += 1;

            for node in affected_nodes_with_containment(source, graph, index) {
                affected
                    .entry(node)
                    .or_default()
                    .push(Contribution::new(source, status));
            }
        }

        tracing::debug!(
            nodes = intrinsic.len(),
            problematic,
            affected = affected.len(),
            "Computed status propagation"
        );

        Self {
            intrinsic,
            affected,
        }
    }

    /// Nodes whose intrinsic status is not `active`, in key order.
    #[must_use]
    pub fn problematic_nodes(&self) -> Vec<NodeKey> {
        self.intrinsic
            .iter()
            .filter(|(_, status)| status.is_problematic())
            .map(|(&key, _)| key)
            .collect()
    }

    /// Intrinsic status of a node, if it is in the snapshot.
    #[must_use]
    pub fn intrinsic_status(&self, key: NodeKey) -> Option<Status> {
        self.intrinsic.get(&key).copied()
    }

    /// Whether any problematic source reaches `key`.
    #[must_use]
    pub fn is_affected(&self, key: NodeKey) -> bool {
        self.affected.contains_key(&key)
    }

    /// Contributions reaching `key`; empty if it is unaffected.
    #[must_use]
    pub fn contributions(&self, key: NodeKey) -> &[Contribution] {
        self.affected.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Worst propagated status reaching `key`.
    #[must_use]
    pub fn merged_status(&self, key: NodeKey) -> Option<Status> {
        merge_severity(self.contributions(key))
    }

    /// Worst of the intrinsic and propagated status of `key`.
    #[must_use]
    pub fn effective_status(&self, key: NodeKey) -> Option<Status> {
        let intrinsic = self.intrinsic_status(key);
        merge_statuses(intrinsic.into_iter().chain(self.merged_status(key)))
    }

    /// Summarize one node, or `None` if it is not in the snapshot.
    #[must_use]
    pub fn node_report(&self, key: NodeKey) -> Option<NodeReport> {
        let intrinsic_status = self.intrinsic_status(key)?;
        let effective_status = self.effective_status(key).unwrap_or(intrinsic_status);
        Some(NodeReport {
            key,
            intrinsic_status,
            propagated_status: self.merged_status(key),
            effective_status,
            affected_by: self.contributions(key).to_vec(),
        })
    }

    /// Every affected node with its contributions, in key order.
    pub fn affected(&self) -> impl Iterator<Item = (NodeKey, &[Contribution])> + '_ {
        self.affected
            .iter()
            .map(|(&key, contributions)| (key, contributions.as_slice()))
    }
}
