//! Snapshot sources.
//!
//! The engine itself never performs I/O. A [`SnapshotSource`] hands it a
//! complete, already resident snapshot; each load is a fresh, independent
//! value, so a caller holding an older snapshot can simply discard it.

use crate::domain::Snapshot;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Anything that can produce a topology snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load the current snapshot.
    async fn load(&self) -> Result<Snapshot>;

    /// Human-readable description of where snapshots come from.
    fn describe(&self) -> String;
}

/// Reads a JSON snapshot document from disk.
///
/// The document has `items`, `groups`, `connections` and `groupConnections`
/// arrays; missing arrays are treated as empty.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn load(&self) -> Result<Snapshot> {
        let content = fs::read_to_string(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| Error::Snapshot(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            groups = snapshot.groups.len(),
            connections = snapshot.connections.len(),
            group_connections = snapshot.group_connections.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a snapshot that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: Snapshot,
}

impl StaticSource {
    /// Wrap a snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.clone())
    }

    fn describe(&self) -> String {
        "<in-memory>".to_string()
    }
}
