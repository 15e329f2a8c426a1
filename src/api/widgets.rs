//! Widget statistics endpoints.

use super::{ApiError, AppState};
use crate::aggregator::{AggregatedResult, WidgetPayload};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

/// GET /api/widgets - Statistics of every enabled widget, keyed by name.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<AggregatedResult>, ApiError> {
    let snapshot = state.snapshot()?;
    Ok(Json(snapshot.aggregator.fetch_all().await))
}

/// GET /api/widgets/:name - Statistics of a single widget.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<WidgetPayload>, ApiError> {
    let snapshot = state.snapshot()?;
    let payload = snapshot.aggregator.fetch_one(&name).await?;
    Ok(Json(payload))
}
