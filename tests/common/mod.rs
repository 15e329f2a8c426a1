//! Shared test utilities for LabDash integration tests.

#![allow(dead_code)]

use labdash::api::{create_router, AppState};
use labdash::client::SharedClient;
use labdash::config::{ConfigLoader, LabDashConfig, WidgetConfig};
use std::sync::Arc;
use std::time::Duration;

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

/// Shared client with a short per-request timeout.
pub fn test_client() -> SharedClient {
    SharedClient::new(Arc::new(reqwest::Client::new()), Duration::from_secs(2))
}

/// Widget pointing at `url` with an API key.
pub fn widget(name: &str, widget_type: &str, url: &str) -> WidgetConfig {
    WidgetConfig::new(name, widget_type, url).with_api_key("test-key")
}

/// Configuration holding the given widgets and nothing else.
pub fn config_with(widgets: Vec<WidgetConfig>) -> LabDashConfig {
    LabDashConfig {
        widgets: widgets.into_iter().map(Arc::new).collect(),
        ..Default::default()
    }
}

/// Router serving a fixed configuration.
pub fn app_for(config: LabDashConfig) -> axum::Router {
    let state = AppState::new(ConfigLoader::from_config(config), test_client());
    create_router(Arc::new(state))
}

/// Router reading its configuration from `path` on every request.
pub fn app_for_file(path: &std::path::Path) -> axum::Router {
    let state = AppState::new(ConfigLoader::new(path), test_client());
    create_router(Arc::new(state))
}

/// Collect a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
