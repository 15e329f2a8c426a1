//! Widget adapter layer.
//!
//! This module provides the `WidgetAdapter` trait and one implementation per
//! supported integration. An adapter knows a single third-party API: which
//! endpoints to call, which auth header to send, and how to turn the raw
//! responses into a flat [`Statistics`] record.

use async_trait::async_trait;

pub mod arr;
pub mod bazarr;
pub mod format;
pub mod jellyfin;
pub mod lidarr;
pub mod prowlarr;
pub mod qbittorrent;
pub mod radarr;
pub mod sonarr;
pub mod types;

pub use bazarr::{BazarrWidget, SubtitleStatistics};
pub use format::{format_bytes, format_speed, share_ratio};
pub use jellyfin::{JellyfinWidget, MediaServerStatistics};
pub use lidarr::{LidarrWidget, MusicStatistics};
pub use prowlarr::{IndexerStatistics, ProwlarrWidget};
pub use qbittorrent::{QBittorrentWidget, TorrentStatistics};
pub use radarr::{MovieStatistics, RadarrWidget};
pub use sonarr::{SeriesStatistics, SonarrWidget};
pub use types::{DisplayMetadata, Statistics, StatisticsRecord, WidgetKind, NOT_ENABLED};

use crate::client::{Credential, FetchError, ServiceClient, SharedClient};
use crate::config::WidgetConfig;

/// Icon used when an adapter does not provide its own.
pub const DEFAULT_ICON: &str = "widget";

/// Colour used when an adapter does not provide its own.
pub const DEFAULT_COLOR: &str = "#333333";

/// Unified interface for all dashboard integrations.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as
/// `Arc<dyn WidgetAdapter>`. Async methods use `async_trait`.
///
/// # Failure model
///
/// Implementors only write [`collect`](WidgetAdapter::collect) and return
/// a `FetchError` for hard failures. The provided
/// [`fetch_statistics`](WidgetAdapter::fetch_statistics) turns every outcome
/// into a [`StatisticsRecord`], so callers never see an `Err`.
#[async_trait]
pub trait WidgetAdapter: Send + Sync + 'static {
    /// Configuration this adapter was built from.
    fn config(&self) -> &WidgetConfig;

    /// Integration type.
    fn kind(&self) -> WidgetKind;

    fn icon(&self) -> &'static str {
        DEFAULT_ICON
    }

    fn color(&self) -> &'static str {
        DEFAULT_COLOR
    }

    fn name(&self) -> &str {
        &self.config().name
    }

    fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    fn display_metadata(&self) -> DisplayMetadata {
        DisplayMetadata {
            name: self.name().to_string(),
            widget_type: self.kind(),
            enabled: self.is_enabled(),
            icon: self.icon().to_string(),
            color: self.color().to_string(),
        }
    }

    /// Call the upstream API and compute statistics.
    ///
    /// Soft (optional) fields must already be defaulted here; an `Err`
    /// means a hard-required call failed.
    async fn collect(&self) -> Result<Statistics, FetchError>;

    /// Fetch this widget's statistics, never failing.
    async fn fetch_statistics(&self) -> StatisticsRecord {
        if !self.is_enabled() {
            return StatisticsRecord::not_enabled();
        }

        match self.collect().await {
            Ok(stats) => StatisticsRecord::Stats(stats),
            Err(e) => {
                tracing::debug!(
                    widget = %self.name(),
                    kind = %self.kind(),
                    error = %e,
                    "Widget collection failed"
                );
                StatisticsRecord::error(e.to_string())
            }
        }
    }
}

/// Bind an adapter's HTTP client, sending `api_key` under `header` when set.
pub(crate) fn service_client(
    config: &WidgetConfig,
    shared: &SharedClient,
    header: &'static str,
) -> ServiceClient {
    let credential = config
        .api_key
        .as_ref()
        .map(|key| Credential::new(header, key.clone()));
    shared.service(&config.url, credential)
}

/// Substitute the default value for a failed optional call.
pub(crate) fn or_default<T: Default>(
    result: Result<T, FetchError>,
    widget: &str,
    field: &'static str,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::debug!(widget = %widget, field, error = %e, "Optional field unavailable, using default");
        T::default()
    })
}
