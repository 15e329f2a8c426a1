//! qBittorrent download client adapter (Web API v2).
//!
//! When both `username` and `password` are configured the adapter logs in
//! first and forwards the session cookie; otherwise it assumes the Web UI
//! bypasses authentication for the dashboard host.

use super::{
    format_bytes, format_speed, service_client, share_ratio, Statistics, WidgetAdapter, WidgetKind,
};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOGIN_REJECTED: &str = "Fails.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TorrentStatistics {
    pub download_speed: String,
    pub upload_speed: String,
    pub total_torrents: u64,
    pub active_downloads: u64,
    pub active_uploads: u64,
    pub downloaded: String,
    pub uploaded: String,
    pub ratio: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TransferInfo {
    #[serde(default)]
    pub dl_info_speed: u64,
    #[serde(default)]
    pub up_info_speed: u64,
    #[serde(default)]
    pub dl_info_data: u64,
    #[serde(default)]
    pub up_info_data: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Torrent {
    #[serde(default)]
    pub state: String,
}

pub struct QBittorrentWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl QBittorrentWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }

    /// Log in when credentials are configured and return the cookie header
    /// to send with the following requests.
    async fn session_headers(&self) -> Result<Vec<(&'static str, String)>, FetchError> {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password)
        else {
            return Ok(Vec::new());
        };

        let (headers, body) = self
            .client
            .post_form(
                "/api/v2/auth/login",
                &[("username", username.as_str()), ("password", password.as_str())],
            )
            .await?;

        if body.trim() == LOGIN_REJECTED {
            return Err(FetchError::Authentication(
                "qBittorrent rejected the configured credentials".to_string(),
            ));
        }

        match session_cookie(&headers) {
            Some(cookie) => Ok(vec![("Cookie", cookie)]),
            None => {
                tracing::debug!(widget = %self.name(), "Login succeeded without a session cookie");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl WidgetAdapter for QBittorrentWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::QBittorrent
    }

    fn icon(&self) -> &'static str {
        "⬇️"
    }

    fn color(&self) -> &'static str {
        "#2b5278"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let session = self.session_headers().await?;

        let transfer: TransferInfo = self
            .client
            .get_json_with_headers("/api/v2/transfer/info", &session)
            .await?;
        let torrents: Vec<Torrent> = self
            .client
            .get_json_with_headers("/api/v2/torrents/info", &session)
            .await?;

        Ok(Statistics::Torrent(summarize(&transfer, &torrents)))
    }
}

pub(crate) fn summarize(transfer: &TransferInfo, torrents: &[Torrent]) -> TorrentStatistics {
    let in_state = |states: &[&str]| {
        torrents
            .iter()
            .filter(|t| states.contains(&t.state.as_str()))
            .count() as u64
    };

    TorrentStatistics {
        download_speed: format_speed(transfer.dl_info_speed),
        upload_speed: format_speed(transfer.up_info_speed),
        total_torrents: torrents.len() as u64,
        active_downloads: in_state(&["downloading"]),
        active_uploads: in_state(&["uploading", "seeding"]),
        downloaded: format_bytes(transfer.dl_info_data),
        uploaded: format_bytes(transfer.up_info_data),
        ratio: share_ratio(transfer.up_info_data, transfer.dl_info_data),
    }
}

/// `SID=<value>` from the login response's `Set-Cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .find(|pair| pair.starts_with("SID="))
        .map(String::from)
}
