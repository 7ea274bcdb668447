//! Domain types for CMDB topologies.
//!
//! This module contains the snapshot records supplied by the persistence
//! layer (items, groups, connections) and the key and status types the
//! propagation engine computes over.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Prefix used by the legacy string form of group keys.
pub const GROUP_KEY_PREFIX: &str = "group-";

/// Identity of a node in the dependency graph.
///
/// Items and groups live in disjoint namespaces, so `Item(3)` and `Group(3)`
/// are distinct nodes. The string form (`"3"` and `"group-3"`) is what the
/// rendering layer keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeKey {
    /// A leaf infrastructure item.
    Item(u64),
    /// A container of items.
    Group(u64),
}

impl NodeKey {
    /// Returns `true` if this key denotes a group.
    #[must_use]
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the numeric identifier within the key's namespace.
    #[must_use]
    pub fn id(self) -> u64 {
        match self {
            Self::Item(id) | Self::Group(id) => id,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Group(id) => write!(f, "{GROUP_KEY_PREFIX}{id}"),
        }
    }
}

impl FromStr for NodeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix(GROUP_KEY_PREFIX) {
            Some(rest) => parse_id(rest).map(Self::Group),
            None => parse_id(trimmed).map(Self::Item),
        };
        parsed.ok_or_else(|| Error::InvalidNodeKey(s.to_string()))
    }
}

/// Decimal digits only; `u64::from_str` would also take a leading `+`.
fn parse_id(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl TryFrom<String> for NodeKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NodeKey> for String {
    fn from(key: NodeKey) -> Self {
        key.to_string()
    }
}

/// Operational status stored on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Running normally
    Active,

    /// Temporarily degraded for planned work
    Maintenance,

    /// Down
    Inactive,

    /// Permanently retired
    Decommissioned,
}

impl Status {
    /// All statuses in declaration order.
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Maintenance,
        Status::Inactive,
        Status::Decommissioned,
    ];

    /// Severity class of this status.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Active => Severity::Healthy,
            Self::Maintenance => Severity::Warning,
            Self::Inactive | Self::Decommissioned => Severity::Critical,
        }
    }

    /// Whether this status degrades the nodes downstream of it.
    #[must_use]
    pub fn is_problematic(self) -> bool {
        self.severity() > Severity::Healthy
    }

    /// Canonical lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
            Self::Decommissioned => "decommissioned",
        }
    }

    /// Position in declaration order. Only used to break ties between
    /// statuses of equal severity so merges are order-independent.
    pub(crate) fn ordinal(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Maintenance => 1,
            Self::Inactive => 2,
            Self::Decommissioned => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

/// Total order over status severities; the highest wins in merges.
///
/// `inactive` and `decommissioned` share [`Severity::Critical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Severity {
    /// Priority 1
    Healthy = 1,
    /// Priority 2
    Warning = 2,
    /// Priority 3
    Critical = 3,
}

impl Severity {
    /// Numeric priority (1 = healthy, 3 = critical).
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Opaque descriptive fields carried through untouched (name, type, location, ...).
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// A leaf infrastructure entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier
    pub id: u64,

    /// Parent group, if the item is grouped
    #[serde(default)]
    pub group_id: Option<u64>,

    /// Stored status
    pub status: Status,

    /// Everything else on the record
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Item {
    /// Create an item with no descriptive attributes.
    pub fn new(id: u64, group_id: Option<u64>, status: Status) -> Self {
        Self {
            id,
            group_id,
            status,
            attributes: Attributes::new(),
        }
    }

    /// Graph key of this item.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::Item(self.id)
    }
}

/// A named container of items. Its status is always derived from members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier
    pub id: u64,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Everything else on the record
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Group {
    /// Create a group with no descriptive attributes.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Graph key of this group.
    #[must_use]
    pub fn key(&self) -> NodeKey {
        NodeKey::Group(self.id)
    }
}

/// Declared directed relationship between an item or group and another.
///
/// Exactly one source form and one target form are expected. When both forms
/// are present the item form is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Source item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<u64>,

    /// Source group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_group_id: Option<u64>,

    /// Target item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u64>,

    /// Target group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group_id: Option<u64>,
}

impl Connection {
    /// Item -> item connection.
    pub fn items(source: u64, target: u64) -> Self {
        Self {
            source_id: Some(source),
            target_id: Some(target),
            ..Self::default()
        }
    }

    /// Item -> group connection.
    pub fn item_to_group(source: u64, target_group: u64) -> Self {
        Self {
            source_id: Some(source),
            target_group_id: Some(target_group),
            ..Self::default()
        }
    }

    /// Group -> item connection.
    pub fn group_to_item(source_group: u64, target: u64) -> Self {
        Self {
            source_group_id: Some(source_group),
            target_id: Some(target),
            ..Self::default()
        }
    }

    /// Resolve the source and target keys of this connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedConnection`] if either endpoint is missing.
    pub fn endpoints(&self) -> Result<(NodeKey, NodeKey)> {
        let source = self
            .source_id
            .map(NodeKey::Item)
            .or_else(|| self.source_group_id.map(NodeKey::Group));
        let target = self
            .target_id
            .map(NodeKey::Item)
            .or_else(|| self.target_group_id.map(NodeKey::Group));

        match (source, target) {
            (Some(source), Some(target)) => Ok((source, target)),
            (None, _) => Err(Error::MalformedConnection(format!(
                "no source in {self:?}"
            ))),
            (_, None) => Err(Error::MalformedConnection(format!(
                "no target in {self:?}"
            ))),
        }
    }
}

/// Group -> group connection, carried in its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConnection {
    /// Source group id
    pub source_id: u64,

    /// Target group id
    pub target_id: u64,
}

impl GroupConnection {
    /// Create a group -> group connection.
    pub fn new(source_id: u64, target_id: u64) -> Self {
        Self {
            source_id,
            target_id,
        }
    }

    /// Source and target keys of this connection.
    #[must_use]
    pub fn endpoints(&self) -> (NodeKey, NodeKey) {
        (NodeKey::Group(self.source_id), NodeKey::Group(self.target_id))
    }
}

/// An immutable view of everything one computation pass needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All items
    #[serde(default)]
    pub items: Vec<Item>,

    /// All groups
    #[serde(default)]
    pub groups: Vec<Group>,

    /// Item/group connections
    #[serde(default)]
    pub connections: Vec<Connection>,

    /// Group -> group connections
    #[serde(default, rename = "groupConnections", alias = "group_connections")]
    pub group_connections: Vec<GroupConnection>,
}
