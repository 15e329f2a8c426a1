//! Read-only views of the loaded configuration.

use super::{ApiError, AppState};
use crate::config::{LabDashConfig, ServiceLink};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// GET /api/services - Service links of all categories, flattened.
pub async fn services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceLink>>, ApiError> {
    let snapshot = state.snapshot()?;
    Ok(Json(
        snapshot.config.services().into_iter().cloned().collect(),
    ))
}

/// GET /api/config - The active configuration with secrets removed.
pub async fn show(State(state): State<Arc<AppState>>) -> Result<Json<LabDashConfig>, ApiError> {
    let snapshot = state.snapshot()?;
    Ok(Json(LabDashConfig::clone(&snapshot.config)))
}
