//! Aggregation scenarios over a registry built from configuration.

mod common;

use common::{test_client, widget};
use labdash::aggregator::{Aggregator, LookupError};
use labdash::config::WidgetConfig;
use labdash::registry::WidgetRegistry;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn aggregator(configs: &[WidgetConfig]) -> Aggregator {
    let configs: Vec<Arc<WidgetConfig>> = configs.iter().cloned().map(Arc::new).collect();
    let registry = WidgetRegistry::build(&configs, &test_client());
    Aggregator::with_limits(Arc::new(registry), 4, Duration::from_secs(5))
}

async fn mount_torrent_client(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/transfer/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dl_info_speed": 0, "up_info_speed": 0, "dl_info_data": 0, "up_info_data": 0
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/torrents/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unknown_type_is_skipped_and_others_fetched() {
    let server = MockServer::start().await;
    mount_torrent_client(&server).await;

    let aggregator = aggregator(&[
        WidgetConfig::new("Downloads", "qbittorrent", &server.uri()),
        widget("Plex", "plex", &server.uri()),
    ]);

    assert_eq!(aggregator.registry().enabled_count(), 1);

    let result = aggregator.fetch_all().await;
    assert_eq!(result.names(), vec!["Downloads"]);

    let downloads = result.get("Downloads").unwrap();
    assert_eq!(downloads.config.name, "Downloads");
    assert_eq!(downloads.config.icon, "⬇️");
    assert_eq!(
        serde_json::to_value(&downloads.data).unwrap(),
        json!({
            "download_speed": "0 B",
            "upload_speed": "0 B",
            "total_torrents": 0,
            "active_downloads": 0,
            "active_uploads": 0,
            "downloaded": "0 B",
            "uploaded": "0 B",
            "ratio": 0.0
        })
    );
}

#[tokio::test]
async fn test_failing_widget_does_not_affect_others() {
    let healthy = MockServer::start().await;
    mount_torrent_client(&healthy).await;

    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let aggregator = aggregator(&[
        widget("Movies", "radarr", &broken.uri()),
        WidgetConfig::new("Downloads", "qbittorrent", &healthy.uri()),
        widget("Media", "jellyfin", &broken.uri()),
    ]);

    let result = aggregator.fetch_all().await;

    assert_eq!(result.names(), vec!["Movies", "Downloads", "Media"]);
    assert_eq!(result.error_count(), 2);
    assert_eq!(
        result.get("Movies").unwrap().data.error_message(),
        Some("HTTP Error: 500 Internal Server Error")
    );
    assert!(!result.get("Downloads").unwrap().data.is_error());
}

#[tokio::test]
async fn test_disabled_widgets_are_excluded_from_fetch_all() {
    let server = MockServer::start().await;
    mount_torrent_client(&server).await;

    let aggregator = aggregator(&[
        WidgetConfig::new("Downloads", "qbittorrent", &server.uri()),
        widget("Movies", "radarr", &server.uri()).disabled(),
    ]);

    let result = aggregator.fetch_all().await;
    assert_eq!(result.names(), vec!["Downloads"]);

    assert_eq!(
        aggregator.fetch_one("Movies").await.unwrap_err(),
        LookupError::NotEnabled
    );
}

#[tokio::test]
async fn test_fetch_one_missing_widget() {
    let aggregator = aggregator(&[]);
    let err = aggregator.fetch_one("Nope").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound);
    assert_eq!(err.to_string(), "Widget not found");
}

#[tokio::test]
async fn test_empty_configuration_yields_empty_object() {
    let result = aggregator(&[]).fetch_all().await;
    assert!(result.is_empty());
    assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
}

#[tokio::test]
async fn test_slow_upstream_hits_widget_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let registry = WidgetRegistry::build(
        &[Arc::new(widget("Music", "lidarr", &server.uri()))],
        &test_client(),
    );
    let aggregator = Aggregator::with_limits(Arc::new(registry), 1, Duration::from_millis(200));

    let result = aggregator.fetch_all().await;
    assert_eq!(
        result.get("Music").unwrap().data.error_message(),
        Some("Widget timed out after 200ms")
    );
}
