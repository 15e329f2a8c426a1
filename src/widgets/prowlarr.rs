//! Prowlarr indexer aggregator adapter (`/api/v1`).
//!
//! All three calls are required: without the stats endpoint the widget has
//! nothing meaningful to show beyond a count.

use super::{service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const API: &str = "/api/v1";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexerStatistics {
    pub version: Option<String>,
    pub total_indexers: u64,
    pub enabled_indexers: u64,
    pub disabled_indexers: u64,
    pub total_queries: u64,
    pub total_grabs: u64,
    /// Mean response time as `"<n>ms"` (rounded, not truncated), or `"N/A"`
    /// without stats.
    pub average_response_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Indexer {
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl Indexer {
    fn is_enabled(&self) -> bool {
        self.enable.unwrap_or(false) || self.enabled.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexerStat {
    #[serde(default)]
    pub number_of_queries: u64,
    #[serde(default)]
    pub number_of_grabs: u64,
    #[serde(default)]
    pub average_response_time: f64,
}

/// `indexerstats` is a bare list on some versions and wrapped on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IndexerStatsResponse {
    List(Vec<IndexerStat>),
    Envelope {
        #[serde(default)]
        indexers: Vec<IndexerStat>,
    },
}

impl IndexerStatsResponse {
    fn into_stats(self) -> Vec<IndexerStat> {
        match self {
            IndexerStatsResponse::List(stats) => stats,
            IndexerStatsResponse::Envelope { indexers } => indexers,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SystemStatus {
    #[serde(default)]
    version: Option<String>,
}

pub struct ProwlarrWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl ProwlarrWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }
}

#[async_trait]
impl WidgetAdapter for ProwlarrWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Prowlarr
    }

    fn icon(&self) -> &'static str {
        "🔍"
    }

    fn color(&self) -> &'static str {
        "#3a3f51"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let indexers: Vec<Indexer> = self.client.get_json(&format!("{}/indexer", API)).await?;
        let stats: IndexerStatsResponse = self
            .client
            .get_json(&format!("{}/indexerstats", API))
            .await?;
        let status: SystemStatus = self
            .client
            .get_json(&format!("{}/system/status", API))
            .await?;

        Ok(Statistics::Indexers(summarize(
            &indexers,
            &stats.into_stats(),
            status.version,
        )))
    }
}

pub(crate) fn summarize(
    indexers: &[Indexer],
    stats: &[IndexerStat],
    version: Option<String>,
) -> IndexerStatistics {
    let enabled = indexers.iter().filter(|i| i.is_enabled()).count() as u64;
    let total = indexers.len() as u64;

    IndexerStatistics {
        version,
        total_indexers: total,
        enabled_indexers: enabled,
        disabled_indexers: total - enabled,
        total_queries: stats.iter().map(|s| s.number_of_queries).sum(),
        total_grabs: stats.iter().map(|s| s.number_of_grabs).sum(),
        average_response_time: average_response_time(stats),
    }
}

/// Mean of the per-indexer response times. The mean is taken in floating
/// point and rounded half away from zero, so `100` and `251` give `176ms`
/// rather than the truncated `175ms`.
fn average_response_time(stats: &[IndexerStat]) -> String {
    if stats.is_empty() {
        return "N/A".to_string();
    }
    let total: f64 = stats.iter().map(|s| s.average_response_time).sum();
    format!("{}ms", (total / stats.len() as f64).round() as i64)
}
