//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)

pub mod color;

use crate::domain::NodeKey;
use crate::graph::EdgeId;
use crate::propagation::{
    AnnotationDiff, EdgeAnnotations, EdgeStyle, NodeReport, PropagationResult,
};
use crate::severity::Palette;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::io::{self, Write};

pub use color::{info, success};

use color::{bold, colored_status_icon, colorize_status, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `CMDB_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `CMDB_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("CMDB_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "CMDB_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("CMDB_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output mode for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print edge annotations in the specified format
pub fn print_annotations(
    annotations: &EdgeAnnotations,
    palette: &Palette,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            write_annotations_text(&mut handle, annotations, &OutputConfig::from_env())
        }
        OutputMode::Json => write_annotations_json(&mut handle, annotations, palette),
    }
}

/// Print the nodes affected by one source
pub fn print_affected(
    source: &NodeReport,
    affected: &[NodeReport],
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            write_affected_text(&mut handle, source, affected, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(
            &mut handle,
            &serde_json::json!({ "source": source, "affected": affected }),
        ),
    }
}

/// Print one node's status summary
pub fn print_node_report(report: &NodeReport, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => write_node_report_text(&mut handle, report, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, report),
    }
}

/// Print the difference between two annotation passes
pub fn print_diff(
    diff: &AnnotationDiff,
    after: &EdgeAnnotations,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => write_diff_text(&mut handle, diff, after, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, diff),
    }
}

// ============================================================================
// JSON
// ============================================================================

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let output = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{output}")
}

/// Edge annotation enriched with its rendering style.
#[derive(Serialize)]
struct StyledAnnotation<'a> {
    #[serde(flatten)]
    result: &'a PropagationResult,
    style: EdgeStyle,
    color: &'a str,
}

fn write_annotations_json<W: Write>(
    w: &mut W,
    annotations: &EdgeAnnotations,
    palette: &Palette,
) -> io::Result<()> {
    let styled: BTreeMap<&EdgeId, StyledAnnotation<'_>> = annotations
        .iter()
        .map(|(id, result)| {
            let style = result.style();
            let color = palette.color(style.color);
            let styled = StyledAnnotation {
                result,
                style,
                color,
            };
            (id, styled)
        })
        .collect();
    write_json(w, &styled)
}

// ============================================================================
// Text
// ============================================================================

fn write_annotations_text<W: Write>(
    w: &mut W,
    annotations: &EdgeAnnotations,
    config: &OutputConfig,
) -> io::Result<()> {
    if annotations.is_empty() {
        return writeln!(w, "No edges.");
    }

    let arrow = if config.use_ascii { "->" } else { "→" };
    for (id, result) in annotations {
        let status = result.effective_status();
        write!(
            w,
            "{} {} {} {} {} {}",
            colored_status_icon(status, config),
            color::info(id.as_str(), config),
            result.source_id,
            dimmed(arrow, config),
            result.target_id,
            colorize_status(status, config),
        )?;
        if let (true, Some(sources)) = (result.is_propagated, &result.propagated_from) {
            write!(w, " {} {}", dimmed("via", config), join_keys(sources))?;
        }
        writeln!(w)?;
    }

    let propagated = annotations.values().filter(|r| r.is_propagated).count();
    writeln!(
        w,
        "\n{} edges, {} propagated",
        annotations.len(),
        propagated
    )
}

fn write_affected_text<W: Write>(
    w: &mut W,
    source: &NodeReport,
    affected: &[NodeReport],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} ({})",
        bold("Source:", config),
        color::info(&source.key.to_string(), config),
        colorize_status(source.intrinsic_status, config)
    )?;

    if affected.is_empty() {
        return writeln!(w, "No affected nodes.");
    }

    let heading = format!("Affected ({}):", affected.len());
    writeln!(w, "{}", bold(&heading, config))?;
    for report in affected {
        writeln!(
            w,
            "  {} {} {}",
            colored_status_icon(report.effective_status, config),
            color::info(&report.key.to_string(), config),
            colorize_status(report.effective_status, config)
        )?;
    }
    Ok(())
}

fn write_node_report_text<W: Write>(
    w: &mut W,
    report: &NodeReport,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        colored_status_icon(report.effective_status, config),
        bold(&report.key.to_string(), config)
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Intrinsic:", config),
        colorize_status(report.intrinsic_status, config)
    )?;
    if let Some(propagated) = report.propagated_status {
        writeln!(
            w,
            "  {} {}",
            dimmed("Propagated:", config),
            colorize_status(propagated, config)
        )?;
    }
    writeln!(
        w,
        "  {} {}",
        dimmed("Effective:", config),
        colorize_status(report.effective_status, config)
    )?;
    if !report.affected_by.is_empty() {
        writeln!(w, "  {}", dimmed("Affected by:", config))?;
        for contribution in &report.affected_by {
            writeln!(
                w,
                "    {} {}",
                color::info(&contribution.source.to_string(), config),
                colorize_status(contribution.status, config)
            )?;
        }
    }
    Ok(())
}

fn write_diff_text<W: Write>(
    w: &mut W,
    diff: &AnnotationDiff,
    after: &EdgeAnnotations,
    config: &OutputConfig,
) -> io::Result<()> {
    if diff.is_empty() {
        return writeln!(w, "{}", success("No changes.", config));
    }

    let sections = [
        ("+", &diff.added),
        ("-", &diff.removed),
        ("~", &diff.changed),
    ];
    for (sigil, ids) in sections {
        for id in ids {
            write!(w, "{sigil} {}", color::info(id.as_str(), config))?;
            if let Some(result) = after.get(id) {
                let status = result.effective_status();
                write!(w, " {}", colorize_status(status, config))?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

fn join_keys(keys: &[NodeKey]) -> String {
    keys.iter()
        .map(NodeKey::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connection, Item, Status};
    use crate::propagation::{annotate_edges, diff_annotations};

    fn plain() -> OutputConfig {
        OutputConfig::new(true, false)
    }

    fn chain_annotations(first: Status) -> EdgeAnnotations {
        let items = vec![
            Item::new(1, None, first),
            Item::new(2, None, Status::Active),
            Item::new(3, None, Status::Active),
        ];
        annotate_edges(
            &items,
            &[Connection::items(1, 2), Connection::items(2, 3)],
            &[],
            &[],
        )
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_annotations_text() {
        let annotations = chain_annotations(Status::Inactive);
        let text = render(|w| write_annotations_text(w, &annotations, &plain()));

        assert!(text.contains("x e1-2 1 -> 2 inactive\n"));
        assert!(text.contains("x e2-3 2 -> 3 inactive via 1\n"));
        assert!(text.contains("2 edges, 1 propagated"));
    }

    #[test]
    fn test_annotations_text_empty() {
        let text = render(|w| write_annotations_text(w, &EdgeAnnotations::new(), &plain()));
        assert_eq!(text, "No edges.\n");
    }

    #[test]
    fn test_annotations_json_includes_style_and_palette_color() {
        let annotations = chain_annotations(Status::Maintenance);
        let text = render(|w| write_annotations_json(w, &annotations, &Palette::default()));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        let edge = &json["e2-3"];
        assert_eq!(edge["isPropagated"], true);
        assert_eq!(edge["propagatedStatus"], "maintenance");
        assert_eq!(edge["style"]["marker"], "cross");
        assert_eq!(edge["style"]["color"], "warning");
        assert_eq!(edge["color"], "#f59e0b");
    }

    #[test]
    fn test_diff_text() {
        let before = chain_annotations(Status::Active);
        let after = chain_annotations(Status::Inactive);
        let diff = diff_annotations(&before, &after);

        let text = render(|w| write_diff_text(w, &diff, &after, &plain()));
        assert_eq!(text, "~ e1-2 inactive\n~ e2-3 inactive\n");

        let unchanged = diff_annotations(&after, &after);
        let text = render(|w| write_diff_text(w, &unchanged, &after, &plain()));
        assert_eq!(text, "No changes.\n");
    }

    #[test]
    fn test_node_report_text() {
        let report = NodeReport {
            key: NodeKey::Item(3),
            intrinsic_status: Status::Active,
            propagated_status: Some(Status::Inactive),
            effective_status: Status::Inactive,
            affected_by: vec![crate::severity::Contribution::new(
                NodeKey::Item(1),
                Status::Inactive,
            )],
        };

        let text = render(|w| write_node_report_text(w, &report, &plain()));
        assert!(text.starts_with("x 3\n"));
        assert!(text.contains("Intrinsic: active"));
        assert!(text.contains("Propagated: inactive"));
        assert!(text.contains("    1 inactive"));
    }
}
