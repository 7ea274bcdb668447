//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use crate::domain::NodeKey;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `annotate` command
#[derive(Parser, Debug, Clone)]
pub struct AnnotateArgs {
    /// Snapshot file (overrides the configured path)
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Only show edges that carry a propagated status
    #[arg(long)]
    pub propagated_only: bool,
}

/// Arguments for the `affected` command
#[derive(Parser, Debug, Clone)]
pub struct AffectedArgs {
    /// Node to start from ("<id>" for items, "group-<id>" for groups)
    pub node: NodeKey,

    /// Snapshot file (overrides the configured path)
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,
}

/// Arguments for the `status` command
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Node to inspect ("<id>" for items, "group-<id>" for groups)
    pub node: NodeKey,

    /// Snapshot file (overrides the configured path)
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,
}

/// Arguments for the `diff` command
#[derive(Parser, Debug, Clone)]
pub struct DiffArgs {
    /// Older snapshot file
    pub before: PathBuf,

    /// Newer snapshot file
    pub after: PathBuf,
}
