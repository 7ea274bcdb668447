//! Renderable edge metadata.

use super::PropagationResult;
use crate::domain::NodeKey;
use crate::severity::{ColorToken, is_problematic, status_to_color};
use serde::{Deserialize, Serialize};

/// Arrow head drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Normal dependency
    Arrow,
    /// Degraded dependency
    Cross,
}

/// How the rendering layer should draw one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStyle {
    /// Stroke colour
    pub color: ColorToken,

    /// Text shown on the edge, if any
    pub label: Option<String>,

    /// Target-end marker
    pub marker: Marker,

    /// Dashed stroke for degraded edges
    pub dashed: bool,
}

impl EdgeStyle {
    pub(super) fn for_result(result: &PropagationResult) -> Self {
        let status = result.effective_status();
        let problematic = is_problematic(status);

        let label = match &result.propagated_from {
            Some(sources) if result.is_propagated => Some(format!(
                "{status} (via {})",
                sources
                    .iter()
                    .map(NodeKey::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            _ if problematic => Some(status.to_string()),
            _ => None,
        };

        Self {
            color: status_to_color(status),
            label,
            marker: if problematic {
                Marker::Cross
            } else {
                Marker::Arrow
            },
            dashed: problematic,
        }
    }
}
