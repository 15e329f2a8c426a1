//! Radarr movie manager adapter (`/api/v3`).

use super::{arr, format_bytes, or_default, service_client, Statistics, WidgetAdapter, WidgetKind};
use crate::client::{FetchError, ServiceClient, SharedClient, API_KEY_HEADER};
use crate::config::WidgetConfig;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const API: &str = "/api/v3";

/// Releases strictly inside this many days from today count as upcoming.
const UPCOMING_DAYS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieStatistics {
    pub total_movies: u64,
    pub monitored: u64,
    pub downloaded: u64,
    /// `monitored - downloaded`; negative when upstream data is inconsistent.
    pub missing: i64,
    pub upcoming: u64,
    pub queue_count: u64,
    pub disk_space: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Movie {
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub in_cinemas: Option<String>,
}

pub struct RadarrWidget {
    config: Arc<WidgetConfig>,
    client: ServiceClient,
}

impl RadarrWidget {
    pub fn new(config: Arc<WidgetConfig>, shared: &SharedClient) -> Self {
        let client = service_client(&config, shared, API_KEY_HEADER);
        Self { config, client }
    }
}

#[async_trait]
impl WidgetAdapter for RadarrWidget {
    fn config(&self) -> &WidgetConfig {
        &self.config
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Radarr
    }

    fn icon(&self) -> &'static str {
        "🎬"
    }

    fn color(&self) -> &'static str {
        "#ffc230"
    }

    async fn collect(&self) -> Result<Statistics, FetchError> {
        let movies: Vec<Movie> = self.client.get_json(&format!("{}/movie", API)).await?;

        let queue_count = or_default(
            arr::queue_count(&self.client, API).await,
            self.name(),
            "queue_count",
        );
        let free_space = or_default(
            arr::free_disk_space(&self.client, API).await,
            self.name(),
            "disk_space",
        );

        let mut stats = summarize(&movies, Utc::now().date_naive());
        stats.queue_count = queue_count;
        stats.disk_space = format_bytes(free_space);
        Ok(Statistics::Movies(stats))
    }
}

/// Library counts derived from the movie list. `today` is a UTC date, the
/// same zone release timestamps are reduced to.
pub(crate) fn summarize(movies: &[Movie], today: NaiveDate) -> MovieStatistics {
    let monitored = movies.iter().filter(|m| m.monitored).count() as u64;
    let downloaded = movies.iter().filter(|m| m.has_file).count() as u64;
    let horizon = today
        .checked_add_days(Days::new(UPCOMING_DAYS))
        .unwrap_or(today);

    let upcoming = movies
        .iter()
        .filter_map(|m| m.in_cinemas.as_deref().and_then(calendar_date))
        .filter(|date| *date > today && *date < horizon)
        .count() as u64;

    MovieStatistics {
        total_movies: movies.len() as u64,
        monitored,
        downloaded,
        missing: monitored as i64 - downloaded as i64,
        upcoming,
        queue_count: 0,
        disk_space: format_bytes(0),
    }
}

/// Calendar date of an upstream timestamp (`2024-05-01T00:00:00Z` or a bare
/// `2024-05-01`).
pub(crate) fn calendar_date(value: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()
}
