//! Comparison of two annotation passes.
//!
//! Edge ids depend only on endpoint keys, so the same logical edge lines up
//! across snapshots.

use super::EdgeAnnotations;
use crate::graph::EdgeId;
use serde::Serialize;

/// Edges that appeared, disappeared or changed between two passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationDiff {
    /// Present only in the newer pass
    pub added: Vec<EdgeId>,
    /// Present only in the older pass
    pub removed: Vec<EdgeId>,
    /// Present in both with different annotations
    pub changed: Vec<EdgeId>,
}

impl AnnotationDiff {
    /// Whether the two passes were identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Compare `before` with `after`. All lists are in edge id order.
#[must_use]
pub fn diff_annotations(before: &EdgeAnnotations, after: &EdgeAnnotations) -> AnnotationDiff {
    let mut diff = AnnotationDiff::default();

    for (id, result) in after {
        match before.get(id) {
            None => diff.added.push(id.clone()),
            Some(previous) if previous != result => diff.changed.push(id.clone()),
            Some(_) => {}
        }
    }
    diff.removed = before
        .keys()
        .filter(|id| !after.contains_key(*id))
        .cloned()
        .collect();

    diff
}
