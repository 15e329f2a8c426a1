//! Widget and service-link configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One configured integration instance.
///
/// `widget_type` is kept as the raw string from the file; mapping it to an
/// adapter (and rejecting unknown values) is the widget registry's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Integration-specific keys the generic layer does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl WidgetConfig {
    /// Minimal enabled widget without credentials.
    pub fn new(
        name: impl Into<String>,
        widget_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            widget_type: widget_type.into(),
            url: url.into(),
            api_key: None,
            username: None,
            password: None,
            enabled: true,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A group of bookmark links shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceLink>,
}

/// A plain link to a self-hosted service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLink {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form labels the dashboard filter matches against.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_config_enabled_by_default() {
        let widget: WidgetConfig = toml::from_str(
            r#"
            name = "Movies"
            type = "radarr"
            url = "http://localhost:7878"
            "#,
        )
        .unwrap();

        assert!(widget.enabled);
        assert!(widget.api_key.is_none());
    }

    #[test]
    fn test_widget_config_keeps_extra_fields() {
        let widget: WidgetConfig = toml::from_str(
            r#"
            name = "Shows"
            type = "sonarr"
            url = "http://localhost:8989"
            api_key = "k"
            enabled = false
            poster_size = "small"
            "#,
        )
        .unwrap();

        assert!(!widget.enabled);
        assert_eq!(widget.api_key.as_deref(), Some("k"));
        assert_eq!(widget.extra["poster_size"], "small");
    }

    #[test]
    fn test_service_link_tags() {
        let link: ServiceLink = toml::from_str(
            r#"
            name = "Grafana"
            url = "http://localhost:3000"
            tags = ["monitoring", "metrics"]
            "#,
        )
        .unwrap();
        assert_eq!(link.tags, vec!["monitoring", "metrics"]);
        assert!(serde_json::to_string(&link).unwrap().contains("\"tags\":[\"monitoring\""));

        let bare: ServiceLink =
            toml::from_str("name = \"Router\"\nurl = \"http://192.168.1.1\"").unwrap();
        assert!(bare.tags.is_empty());
        assert!(!serde_json::to_string(&bare).unwrap().contains("tags"));
    }

    #[test]
    fn test_widget_config_never_serializes_secrets() {
        let widget = WidgetConfig::new("qb", "qbittorrent", "http://qb:8080")
            .with_api_key("key-1")
            .with_login("admin", "hunter2");

        let json = serde_json::to_string(&widget).unwrap();
        assert!(!json.contains("key-1"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("admin"));
        assert!(json.contains("\"type\":\"qbittorrent\""));
    }
}
