//! Bazarr subtitle manager adapter (`/api`).

use super::{or_default, service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubtitleStatistics {
    pub version: Option<String>,
    pub total_series: u64,
    pub series_with_subtitles: u64,
    pub series_without_subtitles: u64,
    pub total_movies: u64,
    pub movies_with_subtitles: u64,
    pub movies_without_subtitles: u64,
    pub total_history: u64,
}

pub struct BazarrWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl BazarrWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }

    /// Optional stats object; `null` (and so all-zero counts) on failure.
    async fn optional(&self, path: &str, field: &'static str) -> Value {
        or_default(self.client.get(path).await, self.name(), field)
    }
}

#[async_trait]
impl WidgetAdapter for BazarrWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Bazarr
    }

    fn icon(&self) -> &'static str {
        "💬"
    }

    fn color(&self) -> &'static str {
        "#6772e5"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let status = self.client.get("/api/system/status").await?;
        let series = self.optional("/api/series/stats", "series_stats").await;
        let movies = self.optional("/api/movies/stats", "movies_stats").await;
        let history = self
            .optional("/api/history?page=1&pageSize=1", "total_history")
            .await;

        Ok(Statistics::Subtitles(summarize(
            &status, &series, &movies, &history,
        )))
    }
}

pub(crate) fn summarize(
    status: &Value,
    series: &Value,
    movies: &Value,
    history: &Value,
) -> SubtitleStatistics {
    SubtitleStatistics {
        version: version(status),
        total_series: count(series, "total"),
        series_with_subtitles: count(series, "with_subtitle"),
        series_without_subtitles: count(series, "without_subtitle"),
        total_movies: count(movies, "total"),
        movies_with_subtitles: count(movies, "with_subtitle"),
        movies_without_subtitles: count(movies, "without_subtitle"),
        total_history: count(history, "total"),
    }
}

/// `bazarr_version`, then `version`, looked up at the top level and inside
/// the `data` envelope newer releases wrap responses in.
fn version(status: &Value) -> Option<String> {
    [status, &status["data"]].into_iter().find_map(|scope| {
        ["bazarr_version", "version"]
            .into_iter()
            .find_map(|key| scope.get(key).and_then(Value::as_str))
            .map(String::from)
    })
}

fn count(stats: &Value, key: &str) -> u64 {
    stats.get(key).and_then(Value::as_u64).unwrap_or(0)
}
