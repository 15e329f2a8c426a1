//! Calls shared by the *arr family (Radarr, Sonarr, Lidarr).
//!
//! The three managers expose the same queue, calendar and disk-space
//! endpoints under their own API prefix (`/api/v3` or `/api/v1`). All of them
//! are optional statistics: callers pass the results through
//! [`or_default`](super::or_default).

use crate::client::{FetchError, ServiceClient};
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueuePage {
    #[serde(default)]
    total_records: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiskSpaceEntry {
    #[serde(default)]
    free_space: Option<u64>,
}

/// `totalRecords` of the paged queue endpoint.
pub async fn queue_count(client: &ServiceClient, api: &str) -> Result<u64, FetchError> {
    let page: QueuePage = client.get_json(&format!("{}/queue", api)).await?;
    Ok(page.total_records)
}

/// Free bytes of the first reported disk, 0 when none is reported.
pub async fn free_disk_space(client: &ServiceClient, api: &str) -> Result<u64, FetchError> {
    let disks: Vec<DiskSpaceEntry> = client.get_json(&format!("{}/diskspace", api)).await?;
    Ok(disks.first().and_then(|d| d.free_space).unwrap_or(0))
}

/// Number of calendar entries between `today` and `today + days`.
pub async fn calendar_count(
    client: &ServiceClient,
    api: &str,
    today: NaiveDate,
    days: u64,
) -> Result<u64, FetchError> {
    let (start, end) = calendar_window(today, days);
    let entries: Vec<Value> = client
        .get_json(&format!("{}/calendar?start={}&end={}", api, start, end))
        .await?;
    Ok(entries.len() as u64)
}

/// `(start, end)` query values for a calendar window, formatted `YYYY-MM-DD`.
pub fn calendar_window(today: NaiveDate, days: u64) -> (String, String) {
    let end = today.checked_add_days(Days::new(days)).unwrap_or(today);
    (
        today.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}
