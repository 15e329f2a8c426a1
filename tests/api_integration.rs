//! Integration tests for the HTTP API.
//!
//! Requests go through the full router, including middleware layers.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{app_for, app_for_file, body_json, body_text, config_with, widget};
use labdash::config::{Category, LabDashConfig, ServiceLink};
use labdash::logging::REQUEST_ID_HEADER;
use serde_json::json;
use tower::Service;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn bazarr_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"bazarr_version": "1.4.3"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/series/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 10, "with_subtitle": 8, "without_subtitle": 2
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_widgets_endpoint_returns_ordered_object() {
    let upstream = bazarr_server().await;
    let mut app = app_for(config_with(vec![
        widget("Subs", "bazarr", &upstream.uri()),
        widget("Broken", "radarr", "http://127.0.0.1:9"),
        widget("Off", "sonarr", &upstream.uri()).disabled(),
    ]));

    let response = app.call(get("/api/widgets")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.find("\"Subs\"").unwrap() < text.find("\"Broken\"").unwrap());

    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    let widgets = body.as_object().unwrap();
    assert_eq!(widgets.len(), 2);
    assert!(!widgets.contains_key("Off"));

    assert_eq!(body["Subs"]["data"]["version"], "1.4.3");
    assert_eq!(body["Subs"]["data"]["total_series"], 10);
    assert_eq!(body["Subs"]["data"]["total_movies"], 0);
    assert_eq!(body["Subs"]["config"]["type"], "bazarr");
    assert_eq!(body["Subs"]["config"]["icon"], "💬");
    assert!(body["Broken"]["data"]["error"]
        .as_str()
        .unwrap()
        .starts_with("Network error"));
}

#[tokio::test]
async fn test_single_widget_endpoint() {
    let upstream = bazarr_server().await;
    let mut app = app_for(config_with(vec![widget("Subs", "bazarr", &upstream.uri())]));

    let response = app.call(get("/api/widgets/Subs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["series_with_subtitles"], 8);
    assert_eq!(body["config"]["name"], "Subs");
    assert_eq!(body["config"]["enabled"], true);
}

#[tokio::test]
async fn test_single_widget_not_found() {
    let mut app = app_for(LabDashConfig::default());

    let response = app.call(get("/api/widgets/Missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Widget not found"}));
}

#[tokio::test]
async fn test_single_widget_disabled() {
    let mut app = app_for(config_with(vec![
        widget("Movies", "radarr", "http://localhost:7878").disabled(),
    ]));

    let response = app.call(get("/api/widgets/Movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({"error": "Widget not enabled"}));
}

#[tokio::test]
async fn test_missing_config_file_is_server_error() {
    let mut app = app_for_file(std::path::Path::new("/nonexistent/labdash.toml"));

    let response = app.call(get("/api/widgets")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(
        error.starts_with("Configuration error: Configuration file not found"),
        "got: {}",
        error
    );
}

#[tokio::test]
async fn test_config_reload_picks_up_new_widgets() {
    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "title = \"Lab\"\n").unwrap();
    let mut app = app_for_file(temp.path());

    let response = app.call(get("/api/widgets/Movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    std::fs::write(
        temp.path(),
        "[[widgets]]\nname = \"Movies\"\ntype = \"radarr\"\nurl = \"http://localhost:7878\"\nenabled = false\n",
    )
    .unwrap();
    let file = std::fs::File::options().write(true).open(temp.path()).unwrap();
    file.set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(5))
        .unwrap();

    let response = app.call(get("/api/widgets/Movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_services_endpoint_flattens_categories() {
    let mut config = LabDashConfig::default();
    config.categories = vec![
        Category {
            name: "Media".to_string(),
            services: vec![ServiceLink {
                name: "Jellyfin".to_string(),
                url: "http://jellyfin.lan".to_string(),
                icon: None,
                description: Some("Streaming".to_string()),
                tags: vec!["media".to_string(), "video".to_string()],
            }],
        },
        Category {
            name: "Infra".to_string(),
            services: vec![ServiceLink {
                name: "Router".to_string(),
                url: "http://192.168.1.1".to_string(),
                icon: Some("🌐".to_string()),
                description: None,
                tags: Vec::new(),
            }],
        },
    ];
    let mut app = app_for(config);

    let response = app.call(get("/api/services")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Jellyfin");
    assert_eq!(body[0]["tags"], json!(["media", "video"]));
    assert_eq!(body[1]["icon"], "🌐");
    assert!(body[1].get("tags").is_none());
}

#[tokio::test]
async fn test_config_endpoint_redacts_secrets() {
    let mut app = app_for(config_with(vec![widget(
        "Movies",
        "radarr",
        "http://localhost:7878",
    )]));

    let response = app.call(get("/api/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.contains("http://localhost:7878"));
    assert!(!text.contains("test-key"));
    assert!(!text.contains("api_key"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut app = app_for_file(std::path::Path::new("/nonexistent/labdash.toml"));

    let response = app.call(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_seconds"].is_u64());
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_request_id_header_on_every_response() {
    let mut app = app_for(LabDashConfig::default());

    let response = app.call(get("/api/widgets/none")).await.unwrap();
    let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(id.len(), common::UUID_V4_STRING_LEN);

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "caller-id")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "caller-id");
}

#[tokio::test]
async fn test_dashboard_page_and_assets() {
    let mut app = app_for(LabDashConfig::default());

    let response = app.call(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<title>LabDash</title>"));

    let response = app.call(get("/assets/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.call(get("/assets/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_route_exists() {
    let mut app = app_for(LabDashConfig::default());

    let response = app.call(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let mut app = app_for(LabDashConfig::default());

    let response = app.call(get("/v1/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
