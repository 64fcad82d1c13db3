use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vitals_core::{create_app, AppState, HealthRegistry};

fn setup_app() -> (Router, HealthRegistry) {
    let health = HealthRegistry::new();
    let app = create_app(AppState::new(health.clone()));
    (app, health)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_empty_registry_reports_healthy() {
    let (app, _) = setup_app();

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"healthy": true, "status": []}));
}

#[tokio::test]
async fn test_all_ok_returns_200_with_entries() {
    let (app, health) = setup_app();
    health.push_health("config", "ok", None);
    health.push_health("server", "ok", None);

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "healthy": true,
            "status": [
                {"name": "config", "status": "ok", "reason": null},
                {"name": "server", "status": "ok", "reason": null}
            ]
        })
    );
}

#[tokio::test]
async fn test_unhealthy_entry_returns_503_with_reason() {
    let (app, health) = setup_app();
    health.push_health("server", "ok", None);
    health.push_health("config", "error", Some("TypeError: config `timeout` is not a number."));

    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["healthy"], json!(false));
    assert_eq!(body["status"][1]["name"], json!("config"));
    assert_eq!(
        body["status"][1]["reason"],
        json!("TypeError: config `timeout` is not a number.")
    );
}

#[tokio::test]
async fn test_probe_reflects_later_updates() {
    let (app, health) = setup_app();
    health.push_health("db", "error", Some("refused"));

    let (status, _) = get_json(app.clone(), "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    health.push_health("db", "ok", None);
    let (status, body) = get_json(app.clone(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"][0]["reason"], Value::Null);

    health.clear_health();
    let (status, body) = get_json(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!([]));
}

#[tokio::test]
async fn test_component_lookup() {
    let (app, health) = setup_app();
    health.push_health("cache", "ok", None);
    health.push_health("queue", "stalled", Some("no consumer"));

    let (status, body) = get_json(app.clone(), "/api/health/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("cache"));

    let (status, body) = get_json(app.clone(), "/api/health/queue").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["data"]["status"], json!("stalled"));

    let (status, body) = get_json(app, "/api/health/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], json!(404));
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (app, _) = setup_app();

    let (status, body) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["endpoints"]["health"], json!("/api/health"));
}
