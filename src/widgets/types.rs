//! Data model shared by all widget adapters.

use super::{
    bazarr::SubtitleStatistics, jellyfin::MediaServerStatistics, lidarr::MusicStatistics,
    prowlarr::IndexerStatistics, qbittorrent::TorrentStatistics, radarr::MovieStatistics,
    sonarr::SeriesStatistics,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error text reported for widgets switched off in the configuration.
pub const NOT_ENABLED: &str = "Widget not enabled";

/// Supported integration types.
///
/// Parsing is case-insensitive so `type = "Radarr"` and `type = "radarr"`
/// select the same adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// qBittorrent download client
    QBittorrent,
    /// Radarr movie manager
    Radarr,
    /// Sonarr series manager
    Sonarr,
    /// Bazarr subtitle manager
    Bazarr,
    /// Prowlarr indexer aggregator
    Prowlarr,
    /// Lidarr music manager
    Lidarr,
    /// Jellyfin media server
    Jellyfin,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::QBittorrent,
        WidgetKind::Radarr,
        WidgetKind::Sonarr,
        WidgetKind::Bazarr,
        WidgetKind::Prowlarr,
        WidgetKind::Lidarr,
        WidgetKind::Jellyfin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::QBittorrent => "qbittorrent",
            WidgetKind::Radarr => "radarr",
            WidgetKind::Sonarr => "sonarr",
            WidgetKind::Bazarr => "bazarr",
            WidgetKind::Prowlarr => "prowlarr",
            WidgetKind::Lidarr => "lidarr",
            WidgetKind::Jellyfin => "jellyfin",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown widget type: {}", s))
    }
}

/// Static rendering hints for one widget. Never influences fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetKind,
    pub enabled: bool,
    pub icon: String,
    pub color: String,
}

/// Normalized statistics of one integration type.
///
/// Serializes flat: the variant name never appears in the JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statistics {
    Torrent(TorrentStatistics),
    Movies(MovieStatistics),
    Series(SeriesStatistics),
    Subtitles(SubtitleStatistics),
    Indexers(IndexerStatistics),
    Music(MusicStatistics),
    MediaServer(MediaServerStatistics),
}

/// Outcome of one widget fetch: statistics or a single `error` key, never
/// both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatisticsRecord {
    Error { error: String },
    Stats(Statistics),
}

impl StatisticsRecord {
    pub fn error(message: impl Into<String>) -> Self {
        StatisticsRecord::Error {
            error: message.into(),
        }
    }

    pub fn not_enabled() -> Self {
        Self::error(NOT_ENABLED)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatisticsRecord::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            StatisticsRecord::Error { error } => Some(error),
            StatisticsRecord::Stats(_) => None,
        }
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        match self {
            StatisticsRecord::Stats(stats) => Some(stats),
            StatisticsRecord::Error { .. } => None,
        }
    }
}

impl From<Statistics> for StatisticsRecord {
    fn from(stats: Statistics) -> Self {
        StatisticsRecord::Stats(stats)
    }
}
