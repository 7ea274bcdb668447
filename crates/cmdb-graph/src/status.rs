//! Node status resolution over a snapshot.
//!
//! Items carry a stored status. Groups have none of their own: a group's
//! status is the worst status among its current member items, or `active`
//! when it has no members.

use crate::domain::{Group, Item, NodeKey, Severity, Snapshot, Status};
use crate::error::{Error, Result};
use crate::severity::merge_statuses;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Lookup tables over one immutable snapshot.
///
/// Membership is keyed by the item's `group_id` as recorded; an item whose
/// parent group is missing from the snapshot is indexed but never reached
/// through containment.
///
/// When an item id is repeated, the record with the most severe status wins
/// (then the higher `group_id`), so the index does not depend on declaration
/// order. A repeated group id keeps its first record.
#[derive(Debug)]
pub struct SnapshotIndex<'a> {
    items: HashMap<u64, &'a Item>,
    groups: HashMap<u64, &'a Group>,
    members: BTreeMap<u64, Vec<u64>>,
}

impl<'a> SnapshotIndex<'a> {
    /// Index a snapshot.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self::from_parts(&snapshot.items, &snapshot.groups)
    }

    /// Index bare item and group slices.
    pub fn from_parts(items: &'a [Item], groups: &'a [Group]) -> Self {
        let mut by_id: HashMap<u64, &'a Item> = HashMap::with_capacity(items.len());
        for item in items {
            match by_id.entry(item.id) {
                Entry::Vacant(slot) => {
                    slot.insert(item);
                }
                Entry::Occupied(mut slot) => {
                    tracing::debug!(id = item.id, "Duplicate item id in snapshot");
                    if record_rank(item) > record_rank(slot.get()) {
                        slot.insert(item);
                    }
                }
            }
        }

        let mut by_group_id: HashMap<u64, &'a Group> = HashMap::with_capacity(groups.len());
        for group in groups {
            match by_group_id.entry(group.id) {
                Entry::Vacant(slot) => {
                    slot.insert(group);
                }
                Entry::Occupied(_) => {
                    tracing::debug!(id = group.id, "Duplicate group id in snapshot");
                }
            }
        }

        let mut members: BTreeMap<u64, Vec<u64>> = BTreeMap::new();
        for item in by_id.values() {
            if let Some(group_id) = item.group_id {
                members.entry(group_id).or_default().push(item.id);
            }
        }
        for ids in members.values_mut() {
            ids.sort_unstable();
        }

        Self {
            items: by_id,
            groups: by_group_id,
            members,
        }
    }

    /// Whether the node exists in the snapshot.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        match key {
            NodeKey::Item(id) => self.items.contains_key(&id),
            NodeKey::Group(id) => self.groups.contains_key(&id),
        }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: u64) -> Option<&'a Item> {
        self.items.get(&id).copied()
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: u64) -> Option<&'a Group> {
        self.groups.get(&id).copied()
    }

    /// Ids of the items whose parent is `group_id`, ascending.
    #[must_use]
    pub fn members(&self, group_id: u64) -> &[u64] {
        self.members.get(&group_id).map_or(&[], Vec::as_slice)
    }

    /// Keys of every item and group in the snapshot, in key order.
    pub fn node_keys(&self) -> Vec<NodeKey> {
        let mut keys: Vec<NodeKey> = self
            .items
            .keys()
            .map(|&id| NodeKey::Item(id))
            .chain(self.groups.keys().map(|&id| NodeKey::Group(id)))
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Resolve the intrinsic status of a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the item or group is not in the
    /// snapshot. Callers inside the engine filter unknown keys first.
    pub fn resolve_status(&self, key: NodeKey) -> Result<Status> {
        match key {
            NodeKey::Item(id) => self
                .item(id)
                .map(|item| item.status)
                .ok_or(Error::NodeNotFound(key)),
            NodeKey::Group(id) => {
                if !self.groups.contains_key(&id) {
                    return Err(Error::NodeNotFound(key));
                }
                let statuses = self
                    .members(id)
                    .iter()
                    .filter_map(|member| self.item(*member))
                    .map(|item| item.status);
                Ok(merge_statuses(statuses).unwrap_or(Status::Active))
            }
        }
    }
}

fn record_rank(item: &Item) -> (Severity, u8, Option<u64>) {
    (item.status.severity(), item.status.ordinal(), item.group_id)
}

/// Resolve one node's status without keeping an index around.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `key` is absent from `items`/`groups`.
pub fn resolve_status(key: NodeKey, items: &[Item], groups: &[Group]) -> Result<Status> {
    SnapshotIndex::from_parts(items, groups).resolve_status(key)
}
