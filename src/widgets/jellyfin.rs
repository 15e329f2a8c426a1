//! Jellyfin media server adapter.
//!
//! Jellyfin ignores `X-Api-Key`; the API key travels in its vendor token
//! header instead.

use super::{or_default, service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, EMBY_TOKEN_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaServerStatistics {
    pub server_name: Option<String>,
    pub version: Option<String>,
    pub movie_count: u64,
    pub series_count: u64,
    pub episode_count: u64,
    pub song_count: u64,
    pub album_count: u64,
    pub active_streams: u64,
    pub total_users: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SystemInfo {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ItemCounts {
    #[serde(default)]
    pub movie_count: u64,
    #[serde(default)]
    pub series_count: u64,
    #[serde(default)]
    pub episode_count: u64,
    #[serde(default)]
    pub song_count: u64,
    #[serde(default)]
    pub album_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Session {
    #[serde(default)]
    pub now_playing_item: Option<Value>,
}

pub struct JellyfinWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl JellyfinWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, EMBY_TOKEN_HEADER);
        Self { config, client }
    }
}

#[async_trait]
impl WidgetAdapter for JellyfinWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Jellyfin
    }

    fn icon(&self) -> &'static str {
        "🎬"
    }

    fn color(&self) -> &'static str {
        "#00a4dc"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let info: SystemInfo = self.client.get_json("/System/Info").await?;
        let counts: ItemCounts = self.client.get_json("/Items/Counts").await?;
        let sessions: Vec<Session> = or_default(
            self.client.get_json("/Sessions").await,
            self.name(),
            "sessions",
        );

        Ok(Statistics::MediaServer(summarize(info, counts, &sessions)))
    }
}

pub(crate) fn summarize(
    info: SystemInfo,
    counts: ItemCounts,
    sessions: &[Session],
) -> MediaServerStatistics {
    MediaServerStatistics {
        server_name: info.server_name,
        version: info.version,
        movie_count: counts.movie_count,
        series_count: counts.series_count,
        episode_count: counts.episode_count,
        song_count: counts.song_count,
        album_count: counts.album_count,
        active_streams: sessions
            .iter()
            .filter(|s| s.now_playing_item.is_some())
            .count() as u64,
        total_users: sessions.len() as u64,
    }
}
