//! Output formatting helpers for CLI commands

use crate::aggregator::WidgetPayload;
use crate::registry::WidgetRegistry;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::{json, Value};

/// How a configured widget ended up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    Enabled,
    Disabled,
    Skipped,
}

/// View model for widget display
#[derive(Debug, Clone, serde::Serialize)]
pub struct WidgetView {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub url: String,
    pub state: WidgetState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Views of every registry entry followed by the skipped ones.
pub fn widget_views(registry: &WidgetRegistry) -> Vec<WidgetView> {
    let built = registry.all().iter().map(|adapter| WidgetView {
        name: adapter.name().to_string(),
        widget_type: adapter.kind().to_string(),
        url: adapter.config().url.clone(),
        state: if adapter.is_enabled() {
            WidgetState::Enabled
        } else {
            WidgetState::Disabled
        },
        reason: None,
    });

    let skipped = registry.skipped().iter().map(|entry| WidgetView {
        name: entry.name.clone(),
        widget_type: entry.widget_type.clone(),
        url: String::new(),
        state: WidgetState::Skipped,
        reason: Some(entry.reason.clone()),
    });

    built.chain(skipped).collect()
}

/// Format widgets as a table
pub fn format_widgets_table(widgets: &[WidgetView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "URL", "State"]);

    for w in widgets {
        let state = match w.state {
            WidgetState::Enabled => "Enabled".green().to_string(),
            WidgetState::Disabled => "Disabled".yellow().to_string(),
            WidgetState::Skipped => format!(
                "{} ({})",
                "Skipped".red(),
                w.reason.as_deref().unwrap_or_default()
            ),
        };

        table.add_row(vec![
            Cell::new(&w.name),
            Cell::new(&w.widget_type),
            Cell::new(&w.url),
            Cell::new(state),
        ]);
    }

    table.to_string()
}

/// Format widgets as JSON
pub fn format_widgets_json(widgets: &[WidgetView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "widgets": widgets }))
}

/// Format fetched statistics as a table, one row per widget.
pub fn format_fetch_table<'a>(
    payloads: impl IntoIterator<Item = (&'a str, &'a WidgetPayload)>,
) -> Result<String, serde_json::Error> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Widget", "Type", "Status", "Statistics"]);

    for (name, payload) in payloads {
        let (status, details) = match payload.data.error_message() {
            Some(message) => ("Error".red().to_string(), message.to_string()),
            None => (
                "OK".green().to_string(),
                statistics_lines(&serde_json::to_value(&payload.data)?),
            ),
        };

        table.add_row(vec![
            Cell::new(format!("{} {}", payload.config.icon, name)),
            Cell::new(payload.config.widget_type),
            Cell::new(status),
            Cell::new(details),
        ]);
    }

    Ok(table.to_string())
}

fn statistics_lines(data: &Value) -> String {
    let Some(fields) = data.as_object() else {
        return data.to_string();
    };

    fields
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}: {}", key, s),
            Value::Null => format!("{}: -", key),
            other => format!("{}: {}", key, other),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
