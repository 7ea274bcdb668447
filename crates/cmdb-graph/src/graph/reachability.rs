//! Downstream reachability over the dependency graph.
//!
//! Traversal is an explicit BFS worklist with a visited set, so cyclic graphs
//! (e.g. `group -> item -> group`) terminate and no node is expanded twice.
//! The source node is visited internally but never reported as affected by
//! itself.
//!
//! # Containment
//!
//! A group reached downstream drags its member items with it: they are
//! affected too, and traversal continues from them. Containment is one
//! directional. An affected item never marks its parent group, and a
//! problematic group does not mark its own members, since its status was
//! derived from them in the first place.

use super::DependencyGraph;
use crate::domain::NodeKey;
use crate::status::SnapshotIndex;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Every node transitively downstream of `source`, excluding `source`.
#[must_use]
pub fn affected_nodes(source: NodeKey, graph: &DependencyGraph) -> BTreeSet<NodeKey> {
    walk(source, graph, None)
}

/// Like [`affected_nodes`], with group -> member containment applied during
/// the walk.
///
/// Containment only applies to groups reached downstream. When `source` is
/// itself a group, its own members are not affected and the walk does not
/// continue from them: the group's status was derived from those members, so
/// a healthy sibling of a failing member keeps propagating nothing.
#[must_use]
pub fn affected_nodes_with_containment(
    source: NodeKey,
    graph: &DependencyGraph,
    index: &SnapshotIndex<'_>,
) -> BTreeSet<NodeKey> {
    walk(source, graph, Some(index))
}

/// Add the member items of every group in `nodes`.
///
/// This is a single containment step over an already computed set; it does
/// not walk further downstream.
#[must_use]
pub fn expand_containment(
    nodes: &BTreeSet<NodeKey>,
    index: &SnapshotIndex<'_>,
) -> BTreeSet<NodeKey> {
    let mut expanded = nodes.clone();
    for key in nodes {
        if let NodeKey::Group(id) = *key {
            let members = index.members(id).iter().map(|&member| NodeKey::Item(member));
            expanded.extend(members);
        }
    }
    expanded
}

fn walk(
    source: NodeKey,
    graph: &DependencyGraph,
    index: Option<&SnapshotIndex<'_>>,
) -> BTreeSet<NodeKey> {
    let mut visited = HashSet::from([source]);
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for dependent in graph.dependents(current) {
            if visited.insert(dependent) {
                queue.push_back(dependent);
            }
        }

        // Containment, skipping the source group's own members
        if let (Some(index), NodeKey::Group(id)) = (index, current)
            && current != source
        {
            for &member in index.members(id) {
                let member = NodeKey::Item(member);
                if visited.insert(member) {
                    queue.push_back(member);
                }
            }
        }
    }

    visited.remove(&source);
    tracing::trace!(%source, affected = visited.len(), "Computed affected nodes");
    visited.into_iter().collect()
}
