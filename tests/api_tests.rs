mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::FakeSource;
use seiyuu::config::Config;
use seiyuu::db::Store;
use seiyuu::state::SharedState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app(store: Store) -> (Router, Arc<SharedState>) {
    spawn_app_with(store, FakeSource::new(3, 2)).await
}

async fn spawn_app_with(store: Store, source: FakeSource) -> (Router, Arc<SharedState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let shared = Arc::new(SharedState::with_source(config, store, Arc::new(source)));
    let state = seiyuu::api::create_app_state(shared.clone(), None);
    (seiyuu::api::router(state).await, shared)
}

async fn empty_app() -> Router {
    spawn_app(Store::in_memory().await.unwrap()).await.0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_counts_on_empty_store() {
    let app = empty_app().await;

    let (status, body) = send(&app, get("/api/counts")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["media"], 0);
    assert_eq!(body["data"]["voice_actors"], 0);
}

#[tokio::test]
async fn test_sync_then_browse() {
    let app = empty_app().await;

    let (status, body) = send(&app, post_json("/api/sync", r#"{"username":"tester"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pages_fetched"], 6);
    assert_eq!(body["data"]["counts"]["media"], 3);

    let (status, body) = send(&app, get("/api/media")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Show 10", "Show 20", "Show 30"]);

    let (_, body) = send(&app, get("/api/sync")).await;
    assert_eq!(body["data"]["username"], "tester");
}

#[tokio::test]
async fn test_sync_requires_username() {
    let app = empty_app().await;

    let (status, body) = send(&app, post_json("/api/sync", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_concurrent_sync_is_refused() {
    let (app, shared) = spawn_app(Store::in_memory().await.unwrap()).await;
    let _running = shared.sync_lock.lock().await;

    let (status, _) = send(&app, post_json("/api/sync", r#"{"username":"tester"}"#)).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sync_finishes_after_client_disconnects() {
    let (app, shared) = spawn_app_with(
        Store::in_memory().await.unwrap(),
        FakeSource::new(3, 2).with_delay(Duration::from_millis(20)),
    )
    .await;

    let request = tokio::spawn(async move {
        app.oneshot(post_json("/api/sync", r#"{"username":"tester"}"#))
            .await
    });
    while shared.sync_lock.try_lock().is_ok() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    request.abort();

    // The lock is released only when the sync task is done.
    let _done = shared.sync_lock.lock().await;
    let last = shared.store.last_sync().await.unwrap().unwrap();
    assert_eq!(last.username, "tester");
    assert_eq!(last.pages_fetched, 6);
    assert_eq!(shared.store.counts().await.unwrap().media, 3);
}

#[tokio::test]
async fn test_graph_endpoint() {
    let (app, _) = spawn_app(common::scenario_store().await).await;

    let (status, body) = send(&app, get("/api/graph/10")).await;
    assert_eq!(status, StatusCode::OK);
    let nodes = body["data"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["id"], "media-10");
    assert_eq!(nodes[0]["type"], "media");
    assert_eq!(nodes[0]["root"], true);
    assert_eq!(body["data"]["links"].as_array().unwrap().len(), 4);

    let (_, body) = send(&app, get("/api/graph/10?hide_root=true&hide_media=true")).await;
    let nodes = body["data"]["nodes"].as_array().unwrap();
    assert!(nodes.iter().all(|n| n["type"] != "media"));
}

#[tokio::test]
async fn test_graph_with_bad_root_is_empty() {
    let app = empty_app().await;

    let (status, body) = send(&app, get("/api/graph/frieren")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nodes"], Value::Array(vec![]));
    assert_eq!(body["data"]["links"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_graph_search_endpoint() {
    let (app, _) = spawn_app(common::scenario_store().await).await;

    let (status, body) = send(&app, get("/api/graph/10/search?q=alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ids"], serde_json::json!(["character-1"]));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = empty_app().await;

    let response = app.clone().oneshot(get("/api/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
