//! Integration tests for status propagation.
//!
//! These tests exercise the engine end to end through its public API:
//! graph construction, status resolution, reachability, severity merging and
//! edge annotation.

use cmdb_graph::domain::{Connection, Group, GroupConnection, Item, NodeKey, Snapshot, Status};
use cmdb_graph::graph::reachability::{affected_nodes, expand_containment};
use cmdb_graph::graph::{DependencyGraph, EdgeId};
use cmdb_graph::propagation::{Marker, annotate_edges, annotate_snapshot};
use cmdb_graph::severity::{ColorToken, Contribution, is_problematic, merge_severity};
use cmdb_graph::status::{SnapshotIndex, resolve_status};
use proptest::prelude::*;
use rstest::rstest;
use std::collections::BTreeSet;

fn item(id: u64) -> NodeKey {
    NodeKey::Item(id)
}

fn group(id: u64) -> NodeKey {
    NodeKey::Group(id)
}

fn edge(source: NodeKey, target: NodeKey) -> EdgeId {
    EdgeId::new(source, target)
}

// ========== Reachability ==========

#[test]
fn test_cycle_terminates_without_self() {
    let graph = DependencyGraph::build(
        &[
            Connection::items(1, 2),
            Connection::items(2, 3),
            Connection::items(3, 1),
        ],
        &[],
    );

    assert_eq!(
        affected_nodes(item(1), &graph),
        BTreeSet::from([item(2), item(3)])
    );
}

#[test]
fn test_mixed_item_group_cycle_terminates() {
    let connections = [
        Connection::item_to_group(1, 10),
        Connection::group_to_item(11, 1),
    ];
    let graph = DependencyGraph::build(&connections, &[GroupConnection::new(10, 11)]);

    assert_eq!(
        affected_nodes(group(10), &graph),
        BTreeSet::from([item(1), group(11)])
    );
}

#[test]
fn test_containment_expansion_reaches_untargeted_members() {
    let items = vec![
        Item::new(1, Some(7), Status::Active),
        Item::new(2, Some(7), Status::Active),
        Item::new(3, None, Status::Inactive),
    ];
    let groups = vec![Group::new(7, "cluster")];
    let index = SnapshotIndex::from_parts(&items, &groups);
    let graph = DependencyGraph::build(&[Connection::item_to_group(3, 7)], &[]);

    let expanded = expand_containment(&affected_nodes(item(3), &graph), &index);

    assert!(expanded.contains(&group(7)));
    assert!(expanded.contains(&item(1)));
    assert!(expanded.contains(&item(2)));
}

// ========== Status resolution and merging ==========

#[rstest]
#[case::all_active(Status::Active, Status::Active, Status::Active)]
#[case::maintenance(Status::Active, Status::Maintenance, Status::Maintenance)]
#[case::inactive_over_maintenance(Status::Maintenance, Status::Inactive, Status::Inactive)]
fn test_group_derivation(#[case] a: Status, #[case] b: Status, #[case] expected: Status) {
    let items = vec![Item::new(1, Some(1), a), Item::new(2, Some(1), b)];
    let groups = vec![Group::new(1, "g")];

    assert_eq!(resolve_status(group(1), &items, &groups).unwrap(), expected);
}

#[test]
fn test_severity_dominance() {
    let merged = merge_severity(&[
        Contribution::new(item(1), Status::Maintenance),
        Contribution::new(item(2), Status::Inactive),
    ]);
    assert_eq!(merged, Some(Status::Inactive));

    let tied = merge_severity(&[
        Contribution::new(item(1), Status::Decommissioned),
        Contribution::new(item(2), Status::Inactive),
    ])
    .unwrap();
    assert!(matches!(tied, Status::Inactive | Status::Decommissioned));
    assert!(is_problematic(tied));
}

// ========== Edge annotation scenarios ==========

#[test]
fn test_chain_scenario_after_head_fails() {
    let mut items = vec![
        Item::new(1, None, Status::Active),
        Item::new(2, None, Status::Active),
        Item::new(3, None, Status::Active),
    ];
    let connections = [Connection::items(1, 2), Connection::items(2, 3)];

    let healthy = annotate_edges(&items, &connections, &[], &[]);
    assert!(healthy.values().all(|result| !result.is_propagated));

    items[0].status = Status::Inactive;
    let annotations = annotate_edges(&items, &connections, &[], &[]);

    let direct = &annotations[&edge(item(1), item(2))];
    assert!(!direct.is_propagated);
    assert_eq!(direct.source_status, Status::Inactive);
    assert_eq!(direct.propagated_status, None);

    let downstream = &annotations[&edge(item(2), item(3))];
    assert!(downstream.is_propagated);
    assert_eq!(downstream.source_status, Status::Active);
    assert_eq!(downstream.propagated_status, Some(Status::Inactive));
    assert_eq!(downstream.propagated_from, Some(vec![item(1)]));
}

#[test]
fn test_orphaned_edge_is_omitted() {
    let items = vec![Item::new(1, None, Status::Inactive)];
    let connections = [
        Connection::items(1, 999),
        Connection::item_to_group(1, 42),
        Connection {
            source_id: Some(1),
            ..Connection::default()
        },
    ];

    let group_connections = [GroupConnection::new(42, 43)];
    let annotations = annotate_edges(&items, &connections, &[], &group_connections);

    assert!(annotations.is_empty());
}

#[test]
fn test_multi_source_merge_on_shared_target() {
    let items = vec![
        Item::new(1, None, Status::Maintenance),
        Item::new(2, None, Status::Inactive),
        Item::new(3, None, Status::Active),
    ];
    let connections = [Connection::items(1, 3), Connection::items(2, 3)];

    let annotations = annotate_edges(&items, &connections, &[], &[]);

    for source in [item(1), item(2)] {
        let incoming = &annotations[&edge(source, item(3))];
        assert!(incoming.is_propagated);
        assert_eq!(incoming.propagated_status, Some(Status::Inactive));
        assert_eq!(incoming.propagated_from, Some(vec![item(1), item(2)]));
    }
}

#[test]
fn test_group_edges_carry_member_failure() {
    // rack 10 holds a failed item; the rack feeds item 5, which feeds group 20.
    // Membership only flows downward, so item 1 itself reaches nothing.
    let items = vec![
        Item::new(1, Some(10), Status::Decommissioned),
        Item::new(2, Some(10), Status::Active),
        Item::new(5, None, Status::Active),
        Item::new(6, Some(20), Status::Active),
    ];
    let groups = vec![Group::new(10, "rack"), Group::new(20, "frontend")];
    let connections = [
        Connection::group_to_item(10, 5),
        Connection::item_to_group(5, 20),
    ];

    let annotations = annotate_edges(&items, &connections, &groups, &[]);

    let from_rack = &annotations[&edge(group(10), item(5))];
    assert_eq!(from_rack.source_status, Status::Decommissioned);
    assert!(!from_rack.is_propagated);
    assert_eq!(from_rack.style().marker, Marker::Cross);

    let into_frontend = &annotations[&edge(item(5), group(20))];
    assert!(into_frontend.is_propagated);
    assert_eq!(
        into_frontend.propagated_status,
        Some(Status::Decommissioned)
    );
    assert_eq!(into_frontend.propagated_from, Some(vec![group(10)]));
    assert_eq!(into_frontend.style().color, ColorToken::Critical);
}

#[test]
fn test_group_to_group_connections_are_annotated() {
    let items = vec![Item::new(1, Some(10), Status::Maintenance)];
    let groups = vec![
        Group::new(10, "a"),
        Group::new(11, "b"),
        Group::new(12, "c"),
    ];

    let annotations = annotate_edges(
        &items,
        &[],
        &groups,
        &[GroupConnection::new(10, 11), GroupConnection::new(11, 12)],
    );

    assert_eq!(annotations.len(), 2);
    assert!(!annotations[&edge(group(10), group(11))].is_propagated);
    let downstream = &annotations[&edge(group(11), group(12))];
    assert!(downstream.is_propagated);
    assert_eq!(downstream.propagated_status, Some(Status::Maintenance));
    assert_eq!(downstream.propagated_from, Some(vec![group(10)]));
}

#[test]
fn test_failing_group_does_not_reach_through_healthy_member() {
    // group 10 fails because of item 1; its healthy member 2 feeds 5 -> 6.
    let items = vec![
        Item::new(1, Some(10), Status::Inactive),
        Item::new(2, Some(10), Status::Active),
        Item::new(5, None, Status::Active),
        Item::new(6, None, Status::Active),
    ];
    let groups = vec![Group::new(10, "rack")];
    let connections = [Connection::items(2, 5), Connection::items(5, 6)];

    let annotations = annotate_edges(&items, &connections, &groups, &[]);

    assert!(!annotations[&edge(item(2), item(5))].is_propagated);
    assert!(!annotations[&edge(item(5), item(6))].is_propagated);
}

#[test]
fn test_repeated_item_id_ignores_declaration_order() {
    let items = vec![
        Item::new(1, None, Status::Active),
        Item::new(1, None, Status::Inactive),
        Item::new(2, None, Status::Active),
        Item::new(3, None, Status::Active),
    ];
    let mut reversed = items.clone();
    reversed.reverse();
    let connections = [Connection::items(1, 2), Connection::items(2, 3)];

    let annotations = annotate_edges(&items, &connections, &[], &[]);
    let reversed_annotations = annotate_edges(&reversed, &connections, &[], &[]);

    assert_eq!(annotations, reversed_annotations);
    assert_eq!(
        annotations[&edge(item(1), item(2))].source_status,
        Status::Inactive
    );
    assert!(annotations[&edge(item(2), item(3))].is_propagated);
}

#[test]
fn test_annotate_snapshot_matches_annotate_edges() {
    let snapshot = Snapshot {
        items: vec![
            Item::new(1, None, Status::Inactive),
            Item::new(2, None, Status::Active),
        ],
        groups: vec![],
        connections: vec![Connection::items(1, 2)],
        group_connections: vec![],
    };

    assert_eq!(
        annotate_snapshot(&snapshot),
        annotate_edges(&snapshot.items, &snapshot.connections, &[], &[])
    );
}

// ========== Properties ==========

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Active),
        Just(Status::Maintenance),
        Just(Status::Inactive),
        Just(Status::Decommissioned),
    ]
}

prop_compose! {
    fn arb_snapshot()(
        records in prop::collection::vec((0u64..8, arb_status(), prop::option::of(0u64..3)), 1..12),
        links in prop::collection::vec((0u64..14, 0u64..14, any::<bool>(), any::<bool>()), 0..30),
        group_links in prop::collection::vec((0u64..4, 0u64..4), 0..6),
    ) -> Snapshot {
        // Ids are drawn from a small range so some repeat
        let items = records
            .into_iter()
            .map(|(id, status, group_id)| Item::new(id, group_id, status))
            .collect();
        let groups = (0..3).map(|id| Group::new(id, format!("g{id}"))).collect();
        let connections = links
            .into_iter()
            .map(|(source, target, source_group, target_group)| Connection {
                source_id: (!source_group).then_some(source),
                source_group_id: source_group.then_some(source % 4),
                target_id: (!target_group).then_some(target),
                target_group_id: target_group.then_some(target % 4),
            })
            .collect();
        let group_connections = group_links
            .into_iter()
            .map(|(source, target)| GroupConnection::new(source, target))
            .collect();

        Snapshot {
            items,
            groups,
            connections,
            group_connections,
        }
    }
}

proptest! {
    #[test]
    fn prop_annotation_is_deterministic(snapshot in arb_snapshot()) {
        prop_assert_eq!(annotate_snapshot(&snapshot), annotate_snapshot(&snapshot));
    }

    #[test]
    fn prop_annotation_ignores_declaration_order(snapshot in arb_snapshot()) {
        let mut reversed = snapshot.clone();
        reversed.items.reverse();
        reversed.groups.reverse();
        reversed.connections.reverse();
        reversed.group_connections.reverse();

        prop_assert_eq!(annotate_snapshot(&snapshot), annotate_snapshot(&reversed));
    }

    #[test]
    fn prop_no_self_propagation(snapshot in arb_snapshot()) {
        let graph = DependencyGraph::build(&snapshot.connections, &snapshot.group_connections);
        for item in &snapshot.items {
            prop_assert!(!affected_nodes(item.key(), &graph).contains(&item.key()));
        }
        for group in &snapshot.groups {
            prop_assert!(!affected_nodes(group.key(), &graph).contains(&group.key()));
        }
    }

    #[test]
    fn prop_annotated_edges_reference_known_nodes(snapshot in arb_snapshot()) {
        let index = SnapshotIndex::new(&snapshot);
        for (id, result) in annotate_snapshot(&snapshot) {
            prop_assert!(index.contains(result.source_id));
            prop_assert!(index.contains(result.target_id));
            prop_assert_eq!(id, EdgeId::new(result.source_id, result.target_id));
            prop_assert_eq!(result.is_propagated, result.propagated_status.is_some());
            prop_assert_eq!(result.is_propagated, result.propagated_from.is_some());
            if let Some(status) = result.propagated_status {
                prop_assert!(is_problematic(status));
            }
        }
    }
}
