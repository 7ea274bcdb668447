//! Per-edge propagation metadata for the rendering layer.

use super::{EdgeStyle, Propagation, known_edges};
use crate::domain::{Connection, Group, GroupConnection, Item, NodeKey, Snapshot, Status};
use crate::graph::{DependencyGraph, Edge, EdgeId};
use crate::severity::merge_severity;
use crate::status::SnapshotIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotations for every renderable edge, keyed by stable edge id.
pub type EdgeAnnotations = BTreeMap<EdgeId, PropagationResult>;

/// Propagation outcome for one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationResult {
    /// Upstream endpoint
    pub source_id: NodeKey,

    /// Downstream endpoint
    pub target_id: NodeKey,

    /// Resolved status of the source node itself
    pub source_status: Status,

    /// Whether the edge carries a status from further upstream
    pub is_propagated: bool,

    /// Merged worst-case status reaching the target, when propagated
    pub propagated_status: Option<Status>,

    /// Every problematic source reaching the target, when propagated
    pub propagated_from: Option<Vec<NodeKey>>,
}

impl PropagationResult {
    /// The status the edge should be drawn with.
    #[must_use]
    pub fn effective_status(&self) -> Status {
        self.propagated_status.unwrap_or(self.source_status)
    }

    /// Colour, label and marker for this edge.
    #[must_use]
    pub fn style(&self) -> EdgeStyle {
        EdgeStyle::for_result(self)
    }
}

/// Annotate every edge of a snapshot.
pub fn annotate_snapshot(snapshot: &Snapshot) -> EdgeAnnotations {
    annotate_edges(
        &snapshot.items,
        &snapshot.connections,
        &snapshot.groups,
        &snapshot.group_connections,
    )
}

/// Annotate every declared edge with its propagation state.
///
/// Edges whose source or target is missing from `items`/`groups` are left
/// out, as are malformed connections. This never fails; an empty snapshot
/// yields an empty map.
///
/// An edge `source -> target` is propagated when at least one problematic
/// node other than `source` reaches `target`. A direct edge out of a failing
/// node therefore stays unpropagated and is drawn from its `source_status`.
/// When propagated, the status merges every contribution reaching `target`,
/// including the edge's own source.
pub fn annotate_edges(
    items: &[Item],
    connections: &[Connection],
    groups: &[Group],
    group_connections: &[GroupConnection],
) -> EdgeAnnotations {
    let index = SnapshotIndex::from_parts(items, groups);

    let edges = known_edges(&index, connections, group_connections);

    let graph = DependencyGraph::from_edges(edges.iter().copied());
    let propagation = Propagation::compute(&index, &graph);

    let annotations: EdgeAnnotations = edges
        .iter()
        .filter_map(|edge| annotate_edge(edge, &propagation).map(|result| (edge.id(), result)))
        .collect();

    tracing::debug!(
        edges = annotations.len(),
        propagated = annotations.values().filter(|r| r.is_propagated).count(),
        "Annotated edges"
    );

    annotations
}

fn annotate_edge(edge: &Edge, propagation: &Propagation) -> Option<PropagationResult> {
    let source_status = propagation.intrinsic_status(edge.source)?;
    let contributions = propagation.contributions(edge.target);

    let is_propagated = contributions.iter().any(|c| c.source != edge.source);
    let (propagated_status, propagated_from) = if is_propagated {
        let mut sources: Vec<NodeKey> = contributions.iter().map(|c| c.source).collect();
        sources.sort_unstable();
        sources.dedup();
        (merge_severity(contributions), Some(sources))
    } else {
        (None, None)
    };

    Some(PropagationResult {
        source_id: edge.source,
        target_id: edge.target,
        source_status,
        is_propagated,
        propagated_status,
        propagated_from,
    })
}
