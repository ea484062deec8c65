use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use movie_swipe_api::{
    api::{create_router, AppState},
    db::Store,
    middleware::request_id::REQUEST_ID_HEADER,
};

async fn create_test_app() -> (Router, Store) {
    let store = Store::in_memory().await.unwrap();
    let app = create_router(AppState::new(store.clone()));
    (app, store)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_hello() {
    let (app, _store) = create_test_app().await;
    let (status, body) = get(app, "/hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Hello, World!" }));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _store) = create_test_app().await;
    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_health_check_with_closed_store() {
    let (app, store) = create_test_app().await;
    store.close().await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().starts_with("Database error"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _store) = create_test_app().await;
    let (status, _) = get(app, "/swipes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _store) = create_test_app().await;
    let id = "6f1c2a8e-3d0b-4a55-9f0e-2b7c1d4e5a60";

    let response = app
        .oneshot(
            Request::builder()
                .uri("/hello")
                .header(REQUEST_ID_HEADER, id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], id);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _store) = create_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/hello").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}
