//! cmdb-graph CLI binary.

use anyhow::Result;
use cmdb_graph::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the cmdb-graph CLI.
///
/// Uses tokio's current_thread runtime; the only async work is file I/O.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=cmdb_graph=debug cargo run -- annotate
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cmdb_graph=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting cmdb-graph CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("cmdb-graph CLI completed successfully");
    Ok(())
}
