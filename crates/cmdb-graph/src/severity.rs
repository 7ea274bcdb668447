//! Severity merging and the status -> colour mapping used by renderers.
//!
//! Semantic colour theme:
//!   - Healthy:  green  (`active`)
//!   - Warning:  amber  (`maintenance`)
//!   - Critical: red    (`inactive`, `decommissioned`)

use crate::domain::{NodeKey, Status};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One problematic source's claim on an affected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// The problematic node the status originates from.
    pub source: NodeKey,
    /// Resolved status of that node.
    pub status: Status,
}

impl Contribution {
    /// Create a contribution.
    pub fn new(source: NodeKey, status: Status) -> Self {
        Self { source, status }
    }
}

/// Reduce contributions to the single worst-case status.
///
/// Higher severity wins. Between statuses of equal severity (`inactive` and
/// `decommissioned`) the later-declared one is picked, so the result never
/// depends on the order of `contributions`. Returns `None` when there is
/// nothing to merge.
#[must_use]
pub fn merge_severity(contributions: &[Contribution]) -> Option<Status> {
    merge_statuses(contributions.iter().map(|c| c.status))
}

/// Same reduction as [`merge_severity`] over bare statuses.
pub(crate) fn merge_statuses(statuses: impl IntoIterator<Item = Status>) -> Option<Status> {
    statuses
        .into_iter()
        .max_by_key(|status| (status.severity(), status.ordinal()))
}

/// Whether edges from a node with this status render as degraded
/// (cross marker, dashed line).
#[must_use]
pub fn is_problematic(status: Status) -> bool {
    status.is_problematic()
}

/// Colour token consumed by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    /// Green
    Healthy,
    /// Amber
    Warning,
    /// Red
    Critical,
}

impl ColorToken {
    /// Token name as the renderer expects it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a status to its colour token. `inactive` and `decommissioned` share one.
#[must_use]
pub fn status_to_color(status: Status) -> ColorToken {
    match status {
        Status::Active => ColorToken::Healthy,
        Status::Maintenance => ColorToken::Warning,
        Status::Inactive | Status::Decommissioned => ColorToken::Critical,
    }
}

/// Concrete colours for each token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Colour for `active`
    pub healthy: String,

    /// Colour for `maintenance`
    pub warning: String,

    /// Colour for `inactive` and `decommissioned`
    pub critical: String,
}

impl Palette {
    /// Colour string for a token.
    #[must_use]
    pub fn color(&self, token: ColorToken) -> &str {
        match token {
            ColorToken::Healthy => &self.healthy,
            ColorToken::Warning => &self.warning,
            ColorToken::Critical => &self.critical,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            healthy: "#22c55e".to_string(),
            warning: "#f59e0b".to_string(),
            critical: "#ef4444".to_string(),
        }
    }
}
