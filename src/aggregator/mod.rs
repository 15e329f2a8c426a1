//! Aggregation facade
//!
//! Fans out over the enabled widgets of a [`WidgetRegistry`], runs each
//! adapter in its own task and joins the results in configuration order.
//!
//! Every widget is isolated: a failing, panicking or hanging adapter yields
//! an `{error}` record for that widget only, so N enabled widgets always
//! produce N entries.

use crate::config::FetchConfig;
use crate::metrics::{self, FetchOutcome};
use crate::registry::WidgetRegistry;
use crate::widgets::{DisplayMetadata, StatisticsRecord, WidgetAdapter};
use futures::stream::{self, StreamExt};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reasons `fetch_one` does not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Widget not found")]
    NotFound,

    #[error("Widget not enabled")]
    NotEnabled,
}

/// Statistics of one widget together with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetPayload {
    pub data: StatisticsRecord,
    pub config: DisplayMetadata,
}

/// Payloads keyed by widget name, in configuration order.
///
/// Serializes as a JSON object whose key order follows the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedResult {
    entries: Vec<(String, WidgetPayload)>,
}

impl AggregatedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&WidgetPayload> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, payload)| payload)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WidgetPayload)> {
        self.entries
            .iter()
            .map(|(name, payload)| (name.as_str(), payload))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of entries whose data is an error record.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, payload)| payload.data.is_error())
            .count()
    }
}

impl Serialize for AggregatedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, payload) in &self.entries {
            map.serialize_entry(name, payload)?;
        }
        map.end()
    }
}

/// Runs widget fetches against one registry snapshot.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: Arc<WidgetRegistry>,
    max_concurrency: usize,
    widget_timeout: Duration,
}

impl Aggregator {
    /// Aggregator using the limits of the `[fetch]` section.
    pub fn new(registry: Arc<WidgetRegistry>, config: &FetchConfig) -> Self {
        Self::with_limits(
            registry,
            config.max_concurrent_fetches,
            Duration::from_secs(config.widget_timeout_seconds),
        )
    }

    pub fn with_limits(
        registry: Arc<WidgetRegistry>,
        max_concurrency: usize,
        widget_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            max_concurrency: max_concurrency.max(1),
            widget_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.registry
    }

    /// Fetch every enabled widget, at most `max_concurrency` at a time.
    pub async fn fetch_all(&self) -> AggregatedResult {
        let widgets = self.registry.enabled_widgets();
        let deadline = self.widget_timeout;

        let pending: Vec<_> = widgets
            .into_iter()
            .map(|widget| fetch_entry(widget, deadline))
            .collect();
        let entries: Vec<(String, WidgetPayload)> = stream::iter(pending)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let result = AggregatedResult { entries };
        tracing::debug!(
            widgets = result.len(),
            errors = result.error_count(),
            "Aggregated widget statistics"
        );
        result
    }

    /// Fetch a single widget by name.
    pub async fn fetch_one(&self, name: &str) -> Result<WidgetPayload, LookupError> {
        let widget = self.registry.find(name).ok_or(LookupError::NotFound)?;
        if !widget.is_enabled() {
            return Err(LookupError::NotEnabled);
        }
        Ok(run_isolated(widget, self.widget_timeout).await)
    }
}

async fn fetch_entry(
    widget: Arc<dyn WidgetAdapter>,
    deadline: Duration,
) -> (String, WidgetPayload) {
    let name = widget.name().to_string();
    (name, run_isolated(widget, deadline).await)
}

/// Run one adapter in its own task, bounded by `deadline`.
async fn run_isolated(widget: Arc<dyn WidgetAdapter>, deadline: Duration) -> WidgetPayload {
    let config = widget.display_metadata();
    let started = Instant::now();

    let mut task = {
        let widget = Arc::clone(&widget);
        tokio::spawn(async move { widget.fetch_statistics().await })
    };

    let (data, outcome) = match tokio::time::timeout(deadline, &mut task).await {
        Ok(Ok(record)) => {
            let outcome = if record.is_error() {
                FetchOutcome::Error
            } else {
                FetchOutcome::Success
            };
            (record, outcome)
        }
        Ok(Err(join_error)) => {
            let message = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                "Widget task was cancelled".to_string()
            };
            (StatisticsRecord::error(message), FetchOutcome::Panic)
        }
        Err(_) => {
            task.abort();
            (
                StatisticsRecord::error(format!(
                    "Widget timed out after {}ms",
                    deadline.as_millis()
                )),
                FetchOutcome::Timeout,
            )
        }
    };

    let elapsed = started.elapsed();
    metrics::record_widget_fetch(widget.name(), widget.kind(), outcome, elapsed);

    match data.error_message() {
        Some(error) => tracing::warn!(
            widget = %widget.name(),
            kind = %widget.kind(),
            outcome = outcome.as_str(),
            error = %error,
            "Widget fetch failed"
        ),
        None => tracing::debug!(
            widget = %widget.name(),
            kind = %widget.kind(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Widget fetched"
        ),
    }

    WidgetPayload { data, config }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Widget panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchError;
    use crate::config::WidgetConfig;
    use crate::registry::WidgetRegistry;
    use crate::widgets::{Statistics, SubtitleStatistics, WidgetKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Succeed,
        Fail,
        Panic,
        Hang,
    }

    struct ScriptedWidget {
        config: WidgetConfig,
        behavior: Behavior,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WidgetAdapter for ScriptedWidget {
        fn config(&self) -> &WidgetConfig {
            &self.config
        }

        fn kind(&self) -> WidgetKind {
            WidgetKind::Bazarr
        }

        async fn collect(&self) -> Result<Statistics, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.behavior {
                Behavior::Succeed => Ok(Statistics::Subtitles(SubtitleStatistics {
                    version: Some(self.config.name.clone()),
                    ..Default::default()
                })),
                Behavior::Fail => Err(FetchError::Network("connection refused".to_string())),
                Behavior::Panic => panic!("adapter exploded"),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!()
                }
            }
        }
    }

    struct Fixture {
        widgets: Vec<Arc<dyn WidgetAdapter>>,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                widgets: Vec::new(),
                in_flight: Arc::new(AtomicUsize::new(0)),
                peak: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn add(mut self, name: &str, enabled: bool, behavior: Behavior) -> Self {
            let mut config = WidgetConfig::new(name, "bazarr", "http://localhost:6767");
            config.enabled = enabled;
            self.widgets.push(Arc::new(ScriptedWidget {
                config,
                behavior,
                in_flight: Arc::clone(&self.in_flight),
                peak: Arc::clone(&self.peak),
            }));
            self
        }

        fn aggregator(&self, max_concurrency: usize, timeout: Duration) -> Aggregator {
            let registry = WidgetRegistry::from_adapters(self.widgets.clone());
            Aggregator::with_limits(Arc::new(registry), max_concurrency, timeout)
        }
    }

    #[tokio::test]
    async fn test_one_failure_among_many_is_isolated() {
        let fixture = Fixture::new()
            .add("a", true, Behavior::Succeed)
            .add("b", true, Behavior::Fail)
            .add("c", true, Behavior::Succeed);

        let result = fixture
            .aggregator(8, Duration::from_secs(5))
            .fetch_all()
            .await;

        assert_eq!(result.len(), 3);
        assert_eq!(result.error_count(), 1);
        assert_eq!(
            result.get("b").unwrap().data.error_message(),
            Some("Network error: connection refused")
        );
        assert!(!result.get("a").unwrap().data.is_error());
    }

    #[tokio::test]
    async fn test_panicking_adapter_becomes_error_record() {
        let fixture = Fixture::new()
            .add("ok", true, Behavior::Succeed)
            .add("boom", true, Behavior::Panic);

        let result = fixture
            .aggregator(8, Duration::from_secs(5))
            .fetch_all()
            .await;

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.get("boom").unwrap().data.error_message(),
            Some("adapter exploded")
        );
        assert_eq!(result.get("boom").unwrap().config.name, "boom");
    }

    #[tokio::test]
    async fn test_hanging_adapter_times_out() {
        let fixture = Fixture::new()
            .add("slow", true, Behavior::Hang)
            .add("fast", true, Behavior::Succeed);

        let result = fixture
            .aggregator(8, Duration::from_millis(200))
            .fetch_all()
            .await;

        assert_eq!(
            result.get("slow").unwrap().data.error_message(),
            Some("Widget timed out after 200ms")
        );
        assert!(!result.get("fast").unwrap().data.is_error());
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_configuration_order() {
        let fixture = Fixture::new()
            .add("zeta", true, Behavior::Succeed)
            .add("alpha", true, Behavior::Succeed)
            .add("off", false, Behavior::Succeed)
            .add("mid", true, Behavior::Succeed);

        let result = fixture
            .aggregator(8, Duration::from_secs(5))
            .fetch_all()
            .await;

        assert_eq!(result.names(), vec!["zeta", "alpha", "mid"]);

        let json = serde_json::to_string(&result).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);
        assert!(!json.contains("\"off\""));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let mut fixture = Fixture::new();
        for i in 0..6 {
            fixture = fixture.add(&format!("w{}", i), true, Behavior::Succeed);
        }

        let result = fixture
            .aggregator(2, Duration::from_secs(5))
            .fetch_all()
            .await;

        assert_eq!(result.len(), 6);
        assert!(fixture.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_payload_shape() {
        let fixture = Fixture::new().add("subs", true, Behavior::Succeed);
        let result = fixture
            .aggregator(1, Duration::from_secs(5))
            .fetch_all()
            .await;

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["subs"]["data"]["version"], "subs");
        assert_eq!(json["subs"]["config"]["type"], "bazarr");
        assert_eq!(json["subs"]["config"]["enabled"], true);
    }

    #[tokio::test]
    async fn test_fetch_one_not_found() {
        let fixture = Fixture::new().add("a", true, Behavior::Succeed);
        let err = fixture
            .aggregator(1, Duration::from_secs(5))
            .fetch_one("missing-widget")
            .await
            .unwrap_err();

        assert_eq!(err, LookupError::NotFound);
        assert_eq!(err.to_string(), "Widget not found");
    }

    #[tokio::test]
    async fn test_fetch_one_disabled() {
        let fixture = Fixture::new().add("a", false, Behavior::Succeed);
        let err = fixture
            .aggregator(1, Duration::from_secs(5))
            .fetch_one("a")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Widget not enabled");
    }

    #[tokio::test]
    async fn test_fetch_one_wraps_panic() {
        let fixture = Fixture::new().add("boom", true, Behavior::Panic);
        let payload = fixture
            .aggregator(1, Duration::from_secs(5))
            .fetch_one("boom")
            .await
            .unwrap();

        assert_eq!(payload.data.error_message(), Some("adapter exploded"));
    }

    #[tokio::test]
    async fn test_empty_registry_yields_empty_result() {
        let aggregator = Fixture::new().aggregator(4, Duration::from_secs(5));
        let result = aggregator.fetch_all().await;
        assert!(result.is_empty());
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42u8)), "Widget panicked");
    }
}
