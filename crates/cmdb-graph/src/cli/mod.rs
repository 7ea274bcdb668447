//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for cmdb-graph using clap's derive API.
//!
//! # Commands
//!
//! - `init`: Write a default `cmdb-graph.yaml`
//! - `annotate`: Annotate every edge of a snapshot with its propagation state
//! - `affected`: Show the nodes downstream of a node
//! - `status`: Show a node's intrinsic and effective status
//! - `diff`: Compare the annotations of two snapshots
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config`: Use an explicit config file instead of discovery
//!
//! # Example
//!
//! ```bash
//! cmdb-graph annotate --snapshot topology.json
//! cmdb-graph affected group-4 --json
//! cmdb-graph diff before.json after.json
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Re-export argument structs
pub use args::{AffectedArgs, AnnotateArgs, DiffArgs, InitArgs, StatusArgs};

/// cmdb-graph - CMDB dependency graph and status propagation
///
/// Computes which items, groups and connections are degraded by an upstream
/// node's status, from a JSON topology snapshot.
#[derive(Parser, Debug)]
#[command(name = "cmdb-graph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration file
    ///
    /// Creates `cmdb-graph.yaml` in the current directory.
    Init(InitArgs),

    /// Annotate every edge with its propagation state
    ///
    /// Prints, per edge, the source status and whether a degraded status
    /// reaches it from further upstream.
    Annotate(AnnotateArgs),

    /// Show the nodes affected by a node
    ///
    /// Walks downstream from the node, including the members of any group
    /// reached, and prints each affected node's merged status.
    Affected(AffectedArgs),

    /// Show a node's status
    ///
    /// Displays the intrinsic, propagated and effective status of a node and
    /// which problematic sources reach it.
    Status(StatusArgs),

    /// Compare the annotations of two snapshots
    Diff(DiffArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let config = self.config.as_deref();

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Annotate(args)) => {
                let app = App::from_directory(
                    &std::env::current_dir()?,
                    config,
                    args.snapshot.as_deref(),
                )
                .await?;
                execute::execute_annotate(&app, args, output_mode).await
            }
            Some(Commands::Affected(args)) => {
                let app = App::from_directory(
                    &std::env::current_dir()?,
                    config,
                    args.snapshot.as_deref(),
                )
                .await?;
                execute::execute_affected(&app, args, output_mode).await
            }
            Some(Commands::Status(args)) => {
                let app = App::from_directory(
                    &std::env::current_dir()?,
                    config,
                    args.snapshot.as_deref(),
                )
                .await?;
                execute::execute_status(&app, args, output_mode).await
            }
            Some(Commands::Diff(args)) => execute::execute_diff(args, output_mode).await,
            None => {
                println!("cmdb-graph status propagation engine");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
