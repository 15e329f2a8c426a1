//! Lidarr music manager adapter (`/api/v1`).

use super::{arr, format_bytes, or_default, service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const API: &str = "/api/v1";
const CALENDAR_DAYS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MusicStatistics {
    pub total_artists: u64,
    pub monitored: u64,
    pub total_albums: u64,
    pub total_tracks: u64,
    pub downloaded_tracks: u64,
    pub missing_tracks: i64,
    pub upcoming_releases: u64,
    pub queue_count: u64,
    pub disk_space: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Artist {
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub statistics: Option<ArtistCounts>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArtistCounts {
    #[serde(default)]
    pub album_count: i64,
    #[serde(default)]
    pub track_count: i64,
    #[serde(default)]
    pub track_file_count: i64,
}

pub struct LidarrWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl LidarrWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }
}

#[async_trait]
impl WidgetAdapter for LidarrWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Lidarr
    }

    fn icon(&self) -> &'static str {
        "🎵"
    }

    fn color(&self) -> &'static str {
        "#159552"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let artists: Vec<Artist> = self.client.get_json(&format!("{}/artist", API)).await?;

        let queue_count = or_default(
            arr::queue_count(&self.client, API).await,
            self.name(),
            "queue_count",
        );
        let today = Local::now().date_naive();
        let upcoming_releases = or_default(
            arr::calendar_count(&self.client, API, today, CALENDAR_DAYS).await,
            self.name(),
            "upcoming_releases",
        );
        let free_space = or_default(
            arr::free_disk_space(&self.client, API).await,
            self.name(),
            "disk_space",
        );

        let mut stats = summarize(&artists);
        stats.upcoming_releases = upcoming_releases;
        stats.queue_count = queue_count;
        stats.disk_space = format_bytes(free_space);
        Ok(Statistics::Music(stats))
    }
}

pub(crate) fn summarize(artists: &[Artist]) -> MusicStatistics {
    let mut albums = 0i64;
    let mut tracks = 0i64;
    let mut files = 0i64;
    for counts in artists.iter().filter_map(|a| a.statistics) {
        albums += counts.album_count;
        tracks += counts.track_count;
        files += counts.track_file_count;
    }

    MusicStatistics {
        total_artists: artists.len() as u64,
        monitored: artists.iter().filter(|a| a.monitored).count() as u64,
        total_albums: albums.max(0) as u64,
        total_tracks: tracks.max(0) as u64,
        downloaded_tracks: files.max(0) as u64,
        missing_tracks: tracks - files,
        upcoming_releases: 0,
        queue_count: 0,
        disk_space: format_bytes(0),
    }
}
