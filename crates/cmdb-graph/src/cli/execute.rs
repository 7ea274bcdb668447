//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;

use super::args::{AffectedArgs, AnnotateArgs, DiffArgs, InitArgs, StatusArgs};
use crate::app::App;
use crate::domain::{NodeKey, Snapshot};
use crate::error::Error;
use crate::graph::DependencyGraph;
use crate::graph::reachability::affected_nodes_with_containment;
use crate::output::{self, OutputMode};
use crate::propagation::{
    EdgeAnnotations, NodeReport, Propagation, annotate_snapshot, diff_annotations, known_edges,
};
use crate::source::{JsonFileSource, SnapshotSource};
use crate::status::SnapshotIndex;

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::config;

    let current_dir = std::env::current_dir()?;
    let config_file = config::init(&current_dir).await?;

    if !args.quiet {
        println!("Wrote default configuration to {}", config_file.display());
    }

    Ok(())
}

/// Execute the annotate command
pub async fn execute_annotate(
    app: &App,
    args: &AnnotateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let snapshot = app.load_snapshot().await?;

    let mut annotations = annotate_snapshot(&snapshot);
    if args.propagated_only {
        annotations.retain(|_, result| result.is_propagated);
    }

    output::print_annotations(&annotations, app.palette(), output_mode)?;
    Ok(())
}

/// Execute the affected command
pub async fn execute_affected(
    app: &App,
    args: &AffectedArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let snapshot = app.load_snapshot().await?;
    let pass = Pass::new(&snapshot);

    let source = pass.report(args.node)?;
    let affected = affected_nodes_with_containment(args.node, &pass.graph, &pass.index)
        .into_iter()
        .map(|key| pass.report(key))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    output::print_affected(&source, &affected, output_mode)?;
    Ok(())
}

/// Execute the status command
pub async fn execute_status(app: &App, args: &StatusArgs, output_mode: OutputMode) -> Result<()> {
    let snapshot = app.load_snapshot().await?;
    let pass = Pass::new(&snapshot);

    output::print_node_report(&pass.report(args.node)?, output_mode)?;
    Ok(())
}

/// Execute the diff command
pub async fn execute_diff(args: &DiffArgs, output_mode: OutputMode) -> Result<()> {
    let before = annotate_file(JsonFileSource::new(&args.before)).await?;
    let after = annotate_file(JsonFileSource::new(&args.after)).await?;

    let diff = diff_annotations(&before, &after);
    output::print_diff(&diff, &after, output_mode)?;
    Ok(())
}

async fn annotate_file(source: JsonFileSource) -> Result<EdgeAnnotations> {
    let snapshot = source.load().await?;
    Ok(annotate_snapshot(&snapshot))
}

/// One propagation pass kept around for node-level queries.
struct Pass<'a> {
    index: SnapshotIndex<'a>,
    graph: DependencyGraph,
    propagation: Propagation,
}

impl<'a> Pass<'a> {
    fn new(snapshot: &'a Snapshot) -> Self {
        let index = SnapshotIndex::new(snapshot);
        let edges = known_edges(&index, &snapshot.connections, &snapshot.group_connections);
        let graph = DependencyGraph::from_edges(edges);
        let propagation = Propagation::compute(&index, &graph);
        Self {
            index,
            graph,
            propagation,
        }
    }

    fn report(&self, key: NodeKey) -> std::result::Result<NodeReport, Error> {
        self.propagation
            .node_report(key)
            .ok_or(Error::NodeNotFound(key))
    }
}
