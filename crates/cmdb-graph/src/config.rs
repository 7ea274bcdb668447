//! Configuration management for cmdb-graph.
//!
//! Configuration lives in a `cmdb-graph.yaml` file, found by walking up from
//! the working directory. Everything has a default, so a missing file is not
//! an error.

use crate::error::{Error, Result};
use crate::severity::Palette;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "cmdb-graph.yaml";

/// Default snapshot path, relative to the directory holding the config
pub const DEFAULT_SNAPSHOT_PATH: &str = "snapshot.json";

/// Maximum directory depth to traverse when searching for the config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CmdbConfig {
    /// Where snapshots are read from
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Concrete colours for the status colour tokens
    #[serde(default)]
    pub palette: Palette,
}

/// Snapshot configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Path to the JSON snapshot, relative paths resolve against the config directory
    pub path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

impl CmdbConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load the nearest config file above `start_dir`, or defaults if none.
    ///
    /// Returns the configuration together with the directory relative
    /// snapshot paths resolve against.
    pub async fn discover(start_dir: &Path) -> Result<(Self, PathBuf)> {
        match find_config_root(start_dir) {
            Some(root) => {
                let config = Self::load(&root.join(CONFIG_FILE_NAME)).await?;
                tracing::debug!(root = %root.display(), "Loaded configuration");
                Ok((config, root))
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Ok((Self::default(), start_dir.to_path_buf()))
            }
        }
    }

    /// Resolve the configured snapshot path against `base_dir`.
    #[must_use]
    pub fn snapshot_path(&self, base_dir: &Path) -> PathBuf {
        if self.snapshot.path.is_absolute() {
            self.snapshot.path.clone()
        } else {
            base_dir.join(&self.snapshot.path)
        }
    }
}

/// Write a default configuration file into `base_dir`.
///
/// # Errors
///
/// Returns an error if a configuration file already exists there or the
/// file cannot be written.
pub async fn init(base_dir: &Path) -> Result<PathBuf> {
    let config_file = base_dir.join(CONFIG_FILE_NAME);

    if config_file.exists() {
        return Err(Error::Config(format!(
            "Already initialized: found existing '{CONFIG_FILE_NAME}'"
        )));
    }

    CmdbConfig::default().save(&config_file).await?;
    Ok(config_file)
}

/// Find the directory holding the config file by searching up the tree.
///
/// Stops at the filesystem root or after [`MAX_TRAVERSAL_DEPTH`] levels.
pub fn find_config_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
