//! Registration table mapping a configured `type` to its adapter.

use super::RegistryError;
use crate::client::SharedClient;
use crate::config::WidgetConfig;
use crate::widgets::{
    BazarrWidget, JellyfinWidget, LidarrWidget, ProwlarrWidget, QBittorrentWidget, RadarrWidget,
    SonarrWidget, WidgetAdapter, WidgetKind,
};
use std::sync::Arc;

/// Create the adapter for one widget configuration.
///
/// The `type` string is matched case-insensitively against [`WidgetKind`].
///
/// # Returns
///
/// An `Arc<dyn WidgetAdapter>` sharing the connection pool of `client`, or
/// `RegistryError::UnknownType` when no adapter handles the type.
///
/// # Examples
///
/// ```
/// use labdash::client::SharedClient;
/// use labdash::config::{FetchConfig, WidgetConfig};
/// use labdash::registry::create_adapter;
/// use std::sync::Arc;
///
/// let client = SharedClient::from_config(&FetchConfig::default()).unwrap();
/// let config = Arc::new(WidgetConfig::new("Shows", "Sonarr", "http://localhost:8989"));
/// let adapter = create_adapter(config, &client).unwrap();
///
/// assert_eq!(adapter.name(), "Shows");
/// assert_eq!(adapter.icon(), "📺");
/// ```
pub fn create_adapter(
    config: Arc<WidgetConfig>,
    client: &SharedClient,
) -> Result<Arc<dyn WidgetAdapter>, RegistryError> {
    let kind: WidgetKind = config
        .widget_type
        .parse()
        .map_err(|_| RegistryError::UnknownType {
            name: config.name.clone(),
            widget_type: config.widget_type.clone(),
        })?;

    let adapter: Arc<dyn WidgetAdapter> = match kind {
        WidgetKind::QBittorrent => Arc::new(QBittorrentWidget::new(config, client)),
        WidgetKind::Radarr => Arc::new(RadarrWidget::new(config, client)),
        WidgetKind::Sonarr => Arc::new(SonarrWidget::new(config, client)),
        WidgetKind::Bazarr => Arc::new(BazarrWidget::new(config, client)),
        WidgetKind::Prowlarr => Arc::new(ProwlarrWidget::new(config, client)),
        WidgetKind::Lidarr => Arc::new(LidarrWidget::new(config, client)),
        WidgetKind::Jellyfin => Arc::new(JellyfinWidget::new(config, client)),
    };

    Ok(adapter)
}
