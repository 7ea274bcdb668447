//! Color and styling helpers for CLI output.
//!
//! Terminal colours follow the same status tokens the renderer uses:
//!   - Healthy:  green  (`active`)
//!   - Warning:  yellow (`maintenance`)
//!   - Critical: red    (`inactive`, `decommissioned`)
//!   - Info:     cyan   (node keys, edge ids)
//!   - Muted:    dimmed (field labels, connectors)

use crate::domain::Status;
use crate::severity::{ColorToken, status_to_color};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

fn paint(text: &str, token: ColorToken) -> String {
    match token {
        ColorToken::Healthy => text.green().to_string(),
        ColorToken::Warning => text.yellow().to_string(),
        ColorToken::Critical => text.red().to_string(),
    }
}

/// Apply color to status text based on its severity.
pub(crate) fn colorize_status(status: Status, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    paint(&text, status_to_color(status))
}

/// Get a colored status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: Status, config: &OutputConfig) -> String {
    let token = status_to_color(status);
    let icon = if config.use_ascii {
        match token {
            ColorToken::Healthy => "+",
            ColorToken::Warning => "!",
            ColorToken::Critical => "x",
        }
    } else {
        match token {
            ColorToken::Healthy => "●",
            ColorToken::Warning => "▲",
            ColorToken::Critical => "✗",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }
    paint(icon, token)
}

/// Apply dimmed style to text (for labels/connectors).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
