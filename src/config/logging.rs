//! `[logging]` section
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [logging.component_levels]
//! aggregator = "debug"
//! widgets = "trace"
//! ```
//!
//! Component names are the crate's top-level modules, see [`COMPONENTS`].
//! Each entry becomes a `labdash::<component>=<level>` filter directive.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Modules that accept a per-component level.
///
/// - `aggregator`: fan-out timing and widget timeouts
/// - `widgets`: adapter calls and degraded optional fields
/// - `client`: upstream HTTP requests and status mapping
/// - `registry`: skipped types and duplicate names
/// - `config`: file reloads
/// - `api`, `dashboard`: HTTP handlers
/// - `logging`: request spans
/// - `metrics`: recorder setup
/// - `cli`: command output and server lifecycle
pub const COMPONENTS: &[&str] = &[
    "aggregator",
    "api",
    "cli",
    "client",
    "config",
    "dashboard",
    "logging",
    "metrics",
    "registry",
    "widgets",
];

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines, for a terminal or `journalctl`
    #[default]
    Pretty,
    /// One JSON object per event, for Loki or similar collectors
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for every target, e.g. `"info"` or `"warn"`.
    pub level: String,
    pub format: LogFormat,
    /// Overrides keyed by component name, kept sorted.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Override the level of one component.
    pub fn with_component(mut self, component: &str, level: &str) -> Self {
        self.component_levels
            .insert(component.to_string(), level.to_string());
        self
    }

    /// First configured component that is not in [`COMPONENTS`].
    pub fn unknown_component(&self) -> Option<&str> {
        self.component_levels
            .keys()
            .map(String::as_str)
            .find(|name| !COMPONENTS.contains(name))
    }
}
