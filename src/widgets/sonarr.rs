//! Sonarr series manager adapter (`/api/v3`).

use super::{arr, format_bytes, or_default, service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const API: &str = "/api/v3";
const CALENDAR_DAYS: u64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub total_series: u64,
    pub monitored: u64,
    pub total_episodes: u64,
    pub downloaded_episodes: u64,
    pub missing_episodes: i64,
    pub upcoming_episodes: u64,
    pub queue_count: u64,
    pub disk_space: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Series {
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub statistics: Option<EpisodeCounts>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EpisodeCounts {
    #[serde(default)]
    pub episode_count: i64,
    #[serde(default)]
    pub episode_file_count: i64,
}

pub struct SonarrWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl SonarrWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }
}

#[async_trait]
impl WidgetAdapter for SonarrWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Sonarr
    }

    fn icon(&self) -> &'static str {
        "📺"
    }

    fn color(&self) -> &'static str {
        "#3a3f51"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let series: Vec<Series> = self.client.get_json(&format!("{}/series", API)).await?;

        let queue_count = or_default(
            arr::queue_count(&self.client, API).await,
            self.name(),
            "queue_count",
        );
        let today = Local::now().date_naive();
        let upcoming_episodes = or_default(
            arr::calendar_count(&self.client, API, today, CALENDAR_DAYS).await,
            self.name(),
            "upcoming_episodes",
        );
        let free_space = or_default(
            arr::free_disk_space(&self.client, API).await,
            self.name(),
            "disk_space",
        );

        let mut stats = summarize(&series);
        stats.upcoming_episodes = upcoming_episodes;
        stats.queue_count = queue_count;
        stats.disk_space = format_bytes(free_space);
        Ok(Statistics::Series(stats))
    }
}

pub(crate) fn summarize(series: &[Series]) -> SeriesStatistics {
    let counts = || series.iter().map(|s| s.statistics.unwrap_or_default());
    let total_episodes: i64 = counts().map(|c| c.episode_count).sum();
    let downloaded_episodes: i64 = counts().map(|c| c.episode_file_count).sum();

    SeriesStatistics {
        total_series: series.len() as u64,
        monitored: series.iter().filter(|s| s.monitored).count() as u64,
        total_episodes: total_episodes.max(0) as u64,
        downloaded_episodes: downloaded_episodes.max(0) as u64,
        missing_episodes: total_episodes - downloaded_episodes,
        upcoming_episodes: 0,
        queue_count: 0,
        disk_space: format_bytes(0),
    }
}
