//! HTTP handlers for dashboard routes

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rust_embed::RustEmbed;
use std::sync::Arc;

use crate::api::{ApiError, AppState};

/// Embedded dashboard assets from dashboard/ directory
#[derive(RustEmbed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Serves the dashboard page with the configured title and refresh interval.
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = match state.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let Some(content) = DashboardAssets::get("index.html") else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard HTML not found").into_response();
    };
    let Ok(template) = std::str::from_utf8(&content.data) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid HTML encoding").into_response();
    };

    let refresh_ms = snapshot.config.server.refresh_interval_seconds.saturating_mul(1000);
    Html(render_page(template, &snapshot.config.title, refresh_ms)).into_response()
}

/// Serves static assets (CSS, JS, etc.)
pub async fn assets_handler(Path(path): Path<String>) -> Response {
    match DashboardAssets::get(&path) {
        Some(content) => {
            let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime_type.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}

fn render_page(template: &str, title: &str, refresh_ms: u64) -> String {
    template
        .replace("{{title}}", &escape_html(title))
        .replace("{{refresh_ms}}", &refresh_ms.to_string())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
