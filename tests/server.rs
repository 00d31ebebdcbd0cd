use std::sync::Arc;

use axum::body::{self, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use runtime_headers::config::RuntimeHeadersConfig;
use runtime_headers::notifications::Notifier;
use runtime_headers::{server, AppState};

fn app() -> (Notifier, Router) {
    let notifier = Notifier::new();
    let state = Arc::new(AppState::new(notifier.clone()));
    state.store.seed();
    (notifier, server::create_router(state, RuntimeHeadersConfig::default()))
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

fn header<'a>(resp: &'a Response<Body>, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

async fn json_body(resp: Response<Body>) -> Value {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn show_user_reports_all_headers() {
    let (_n, app) = app();
    let resp = get(&app, "/api/users/usr_00000001").await;
    assert_eq!(resp.status(), StatusCode::OK);
    // The schema lookup on first touch is not counted.
    assert_eq!(header(&resp, "x-sql-queries"), Some("1"));
    assert!(header(&resp, "x-view-runtime").is_some());
    assert!(header(&resp, "x-db-runtime").is_some());

    let body = json_body(resp).await;
    assert_eq!(body["id"], "usr_00000001");
}

#[tokio::test]
async fn missing_user_has_no_view_runtime() {
    let (_n, app) = app();
    let resp = get(&app, "/api/users/nobody").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&resp, "x-sql-queries"), Some("1"));
    assert_eq!(header(&resp, "x-view-runtime"), None);
    assert!(header(&resp, "x-db-runtime").is_some());

    let body = json_body(resp).await;
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn create_user_counts_both_queries() {
    let (_n, app) = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Ada Lopez", "email": "ada@example.com" }).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(header(&resp, "x-sql-queries"), Some("2"));

    let body = json_body(resp).await;
    assert_eq!(body["user"]["role"], "viewer");
    assert_eq!(body["total_users"], 1001);
}

#[tokio::test]
async fn create_user_rejects_blank_name() {
    let (_n, app) = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "name": " ", "email": "x@example.com" }).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&resp, "x-sql-queries"), Some("0"));
    assert_eq!(header(&resp, "x-db-runtime"), Some("0"));
}

#[tokio::test]
async fn show_product() {
    let (_n, app) = app();
    let resp = get(&app, "/api/products/prod_0001").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "x-sql-queries"), Some("1"));
    assert_eq!(json_body(resp).await["title"], "Premium Keyboard");
}

#[tokio::test]
async fn health_bypasses_controller_metrics() {
    let (n, app) = app();
    let resp = get(&app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "x-sql-queries"), Some("0"));
    assert_eq!(header(&resp, "x-view-runtime"), None);
    assert_eq!(header(&resp, "x-db-runtime"), None);
    assert_eq!(n.active_subscriptions(), 0);
}
