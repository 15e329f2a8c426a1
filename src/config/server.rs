//! Server configuration

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often the browser re-polls `/api/widgets`.
    pub refresh_interval_seconds: u64,
    /// Upper bound for any single HTTP request handled by the dashboard.
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4567,
            refresh_interval_seconds: 30,
            request_timeout_seconds: 60,
        }
    }
}
