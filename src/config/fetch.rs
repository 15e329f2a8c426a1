//! Upstream fetch configuration

use serde::{Deserialize, Serialize};

/// Limits applied when talking to widget services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request deadline covering the full request/response exchange.
    pub timeout_seconds: u64,
    /// TCP/TLS connect deadline.
    pub connect_timeout_seconds: u64,
    /// Deadline for one widget's whole fetch (all of its sequential calls).
    pub widget_timeout_seconds: u64,
    /// Maximum number of widgets fetched at the same time.
    pub max_concurrent_fetches: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            connect_timeout_seconds: 5,
            widget_timeout_seconds: 30,
            max_concurrent_fetches: 8,
        }
    }
}
