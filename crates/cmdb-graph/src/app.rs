//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that resolves configuration and the
//! snapshot source a command runs against.
//!
//! # Example
//!
//! ```no_run
//! use cmdb_graph::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new("."), None, None).await?;
//!     let snapshot = app.load_snapshot().await?;
//!     println!("{} items", snapshot.items.len());
//!     Ok(())
//! }
//! ```

use crate::config::CmdbConfig;
use crate::domain::Snapshot;
use crate::error::Result;
use crate::severity::Palette;
use crate::source::{JsonFileSource, SnapshotSource};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
pub struct App {
    /// Loaded (or default) configuration
    config: CmdbConfig,

    /// Directory relative config paths resolve against
    config_root: PathBuf,

    /// Where snapshots come from (trait object for polymorphism)
    source: Box<dyn SnapshotSource>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("config_root", &self.config_root)
            .field("source", &self.source.describe())
            .finish()
    }
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// `config_path` overrides config discovery; `snapshot_path` overrides
    /// the configured snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or discovered config file cannot be
    /// read or parsed.
    pub async fn from_directory(
        working_dir: &Path,
        config_path: Option<&Path>,
        snapshot_path: Option<&Path>,
    ) -> Result<Self> {
        let (config, config_root) = match config_path {
            Some(path) => {
                let config = CmdbConfig::load(path).await?;
                let root = path
                    .parent()
                    .map_or_else(|| working_dir.to_path_buf(), Path::to_path_buf);
                (config, root)
            }
            None => CmdbConfig::discover(working_dir).await?,
        };

        let snapshot_file = match snapshot_path {
            Some(path) => working_dir.join(path),
            None => config.snapshot_path(&config_root),
        };

        Ok(Self::with_source(
            config,
            config_root,
            Box::new(JsonFileSource::new(snapshot_file)),
        ))
    }

    /// Create an App around an explicit snapshot source.
    pub fn with_source(
        config: CmdbConfig,
        config_root: PathBuf,
        source: Box<dyn SnapshotSource>,
    ) -> Self {
        Self {
            config,
            config_root,
            source,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CmdbConfig {
        &self.config
    }

    /// Get the configured palette.
    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    /// Get the directory the configuration was resolved from.
    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    /// Get the snapshot source.
    pub fn source(&self) -> &dyn SnapshotSource {
        self.source.as_ref()
    }

    /// Load a fresh snapshot from the source.
    pub async fn load_snapshot(&self) -> Result<Snapshot> {
        self.source.load().await
    }
}
