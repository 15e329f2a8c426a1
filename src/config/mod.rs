//! Configuration module for LabDash
//!
//! Provides layered configuration loading from a TOML file, environment
//! variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LABDASH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use labdash::config::LabDashConfig;
//!
//! let toml = r#"
//! title = "Home Lab"
//!
//! [[widgets]]
//! name = "Movies"
//! type = "radarr"
//! url = "http://localhost:7878"
//! api_key = "secret"
//! "#;
//! let config: LabDashConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.widgets.len(), 1);
//! assert_eq!(config.server.port, 4567);
//! ```

pub mod error;
pub mod fetch;
pub mod loader;
pub mod logging;
pub mod server;
pub mod widget;

pub use error::ConfigError;
pub use fetch::FetchConfig;
pub use loader::{ConfigLoader, LoadedConfig};
pub use logging::{LogFormat, LoggingConfig, COMPONENTS as LOG_COMPONENTS};
pub use server::ServerConfig;
pub use widget::{Category, ServiceLink, WidgetConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Unified configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabDashConfig {
    /// Page title
    pub title: String,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Upstream fetch limits
    pub fetch: FetchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Statistic widgets, in display order. Shared with the adapters built
    /// from this configuration.
    pub widgets: Vec<Arc<WidgetConfig>>,
    /// Bookmark link groups
    pub categories: Vec<Category>,
}

impl Default for LabDashConfig {
    fn default() -> Self {
        Self {
            title: "LabDash".to_string(),
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
            widgets: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl LabDashConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports LABDASH_* environment variables for server and logging
    /// settings. Invalid values are ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("LABDASH_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("LABDASH_HOST") {
            self.server.host = host;
        }
        if let Ok(level) = std::env::var("LABDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LABDASH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// Widget `type` values are not checked here: unknown
    /// types are skipped with a warning when the widget registry is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation("server.port", "port must be non-zero"));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "fetch.timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.fetch.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "fetch.connect_timeout_seconds",
                "connect timeout must be non-zero",
            ));
        }
        if self.fetch.widget_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "fetch.widget_timeout_seconds",
                "widget timeout must be non-zero",
            ));
        }
        if self.fetch.widget_timeout_seconds >= self.server.request_timeout_seconds {
            return Err(ConfigError::validation(
                "fetch.widget_timeout_seconds",
                "must be lower than server.request_timeout_seconds",
            ));
        }
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(ConfigError::validation(
                "fetch.max_concurrent_fetches",
                "must allow at least one fetch",
            ));
        }

        if let Some(component) = self.logging.unknown_component() {
            return Err(ConfigError::validation(
                format!("logging.component_levels.{}", component),
                format!(
                    "unknown component, expected one of: {}",
                    LOG_COMPONENTS.join(", ")
                ),
            ));
        }

        for (i, widget) in self.widgets.iter().enumerate() {
            if widget.name.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("widgets[{}].name", i),
                    "name cannot be empty",
                ));
            }
            if widget.widget_type.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("widgets[{}].type", i),
                    "type cannot be empty",
                ));
            }
            if widget.url.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("widgets[{}].url", i),
                    "URL cannot be empty",
                ));
            }
        }

        for (c, category) in self.categories.iter().enumerate() {
            for (s, service) in category.services.iter().enumerate() {
                if service.name.trim().is_empty() {
                    return Err(ConfigError::validation(
                        format!("categories[{}].services[{}].name", c, s),
                        "name cannot be empty",
                    ));
                }
                if service.url.trim().is_empty() {
                    return Err(ConfigError::validation(
                        format!("categories[{}].services[{}].url", c, s),
                        "URL cannot be empty",
                    ));
                }
            }
        }

        Ok(())
    }

    /// All service links across categories, in file order.
    pub fn services(&self) -> Vec<&ServiceLink> {
        self.categories
            .iter()
            .flat_map(|category| category.services.iter())
            .collect()
    }
}
