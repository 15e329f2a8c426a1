//! # Metrics Collection Module
//!
//! Prometheus export of widget fetch activity.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `labdash_widget_fetches_total{widget, kind, outcome}` - Widget fetches by outcome
//!
//! **Histograms:**
//! - `labdash_widget_fetch_duration_seconds{widget, kind}` - Time to fetch one widget
//!
//! **Gauges:**
//! - `labdash_widgets_configured` - Adapters in the current registry
//! - `labdash_widgets_enabled` - Enabled adapters in the current registry
//!
//! Recording is a no-op until a recorder is installed, so the aggregation
//! code records unconditionally.

pub mod handler;

use crate::widgets::WidgetKind;
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Duration;

pub const WIDGET_FETCHES_TOTAL: &str = "labdash_widget_fetches_total";
pub const WIDGET_FETCH_DURATION: &str = "labdash_widget_fetch_duration_seconds";
pub const WIDGETS_CONFIGURED: &str = "labdash_widgets_configured";
pub const WIDGETS_ENABLED: &str = "labdash_widgets_enabled";

/// How a single widget fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Statistics returned
    Success,
    /// Adapter returned an error record
    Error,
    /// Whole-widget deadline elapsed
    Timeout,
    /// Adapter task panicked
    Panic,
}

impl FetchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Success => "success",
            FetchOutcome::Error => "error",
            FetchOutcome::Timeout => "timeout",
            FetchOutcome::Panic => "panic",
        }
    }
}

/// Record one finished widget fetch.
pub fn record_widget_fetch(
    widget: &str,
    kind: WidgetKind,
    outcome: FetchOutcome,
    elapsed: Duration,
) {
    metrics::counter!(
        WIDGET_FETCHES_TOTAL,
        "widget" => widget.to_string(),
        "kind" => kind.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    metrics::histogram!(
        WIDGET_FETCH_DURATION,
        "widget" => widget.to_string(),
        "kind" => kind.as_str()
    )
    .record(elapsed.as_secs_f64());
}

/// Publish registry size gauges after a (re)build.
pub fn update_widget_gauges(configured: usize, enabled: usize) {
    metrics::gauge!(WIDGETS_CONFIGURED).set(configured as f64);
    metrics::gauge!(WIDGETS_ENABLED).set(enabled as f64);
}

/// Initialize Prometheus metrics exporter with custom histogram buckets.
///
/// Buckets follow typical home-lab API latencies: most widgets answer in
/// well under a second, a stuck one runs into the fetch timeout.
/// Buckets: [0.05, 0.1, 0.25, 0.5, 1, 2.5, 5, 10, 30] seconds.
///
/// Returns a PrometheusHandle that can be used to render metrics.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let duration_buckets = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(WIDGET_FETCH_DURATION.to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
