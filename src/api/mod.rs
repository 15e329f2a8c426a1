//! # HTTP API
//!
//! JSON endpoints consumed by the dashboard page, plus health and metrics.
//!
//! ## Endpoints
//!
//! - `GET /api/widgets` - Statistics of every enabled widget, keyed by name
//! - `GET /api/widgets/:name` - Statistics of one widget
//! - `GET /api/services` - Bookmark links of all categories
//! - `GET /api/config` - Active configuration, secrets removed
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus text format metrics
//!
//! ## Example
//!
//! ```no_run
//! use labdash::api::{create_router, AppState};
//! use labdash::client::SharedClient;
//! use labdash::config::{ConfigLoader, FetchConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SharedClient::from_config(&FetchConfig::default())?;
//! let state = Arc::new(AppState::new(ConfigLoader::new("labdash.toml"), client));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4567").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration reloads
//!
//! Each request asks the [`ConfigLoader`] for the current configuration.
//! When the loader reports a new generation the widget registry is rebuilt
//! from scratch; otherwise the cached [`Snapshot`] is reused.

mod config;
mod error;
mod health;
mod widgets;

pub use error::{ApiError, ErrorBody};
pub use health::HealthResponse;

use crate::aggregator::Aggregator;
use crate::client::SharedClient;
use crate::config::{ConfigError, ConfigLoader, LabDashConfig};
use crate::registry::WidgetRegistry;
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Default bound on a whole HTTP request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration and widget registry built from one configuration generation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: u64,
    pub config: Arc<LabDashConfig>,
    pub aggregator: Aggregator,
}

/// Shared application state accessible to all handlers.
pub struct AppState {
    loader: ConfigLoader,
    client: SharedClient,
    snapshot: RwLock<Option<Snapshot>>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Prometheus handle for `/metrics`; `None` renders an empty page
    pub metrics_handle: Option<PrometheusHandle>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(loader: ConfigLoader, client: SharedClient) -> Self {
        Self {
            loader,
            client,
            snapshot: RwLock::new(None),
            start_time: Instant::now(),
            metrics_handle: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Current configuration and aggregator, rebuilding the registry when
    /// the configuration generation changed.
    pub fn snapshot(&self) -> Result<Snapshot, ConfigError> {
        let loaded = self.loader.load()?;

        if let Some(current) = self.cached(loaded.generation) {
            return Ok(current);
        }

        let mut slot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = slot.as_ref().filter(|s| s.generation == loaded.generation) {
            return Ok(current.clone());
        }

        let registry = WidgetRegistry::build(&loaded.config.widgets, &self.client);
        crate::metrics::update_widget_gauges(registry.len(), registry.enabled_count());
        tracing::info!(
            generation = loaded.generation,
            widgets = registry.len(),
            enabled = registry.enabled_count(),
            skipped = registry.skipped().len(),
            "Widget registry rebuilt"
        );

        let snapshot = Snapshot {
            generation: loaded.generation,
            aggregator: Aggregator::new(Arc::new(registry), &loaded.config.fetch),
            config: loaded.config,
        };
        *slot = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn cached(&self, generation: u64) -> Option<Snapshot> {
        let slot = self.snapshot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|s| s.generation == generation)
            .cloned()
    }
}

/// Create the main router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .route("/", get(crate::dashboard::dashboard_handler))
        .route("/assets/*path", get(crate::dashboard::assets_handler))
        .route("/api/widgets", get(widgets::list))
        .route("/api/widgets/:name", get(widgets::show))
        .route("/api/services", get(config::services))
        .route("/api/config", get(config::show))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(crate::logging::propagate_request_id))
        .with_state(state)
}
