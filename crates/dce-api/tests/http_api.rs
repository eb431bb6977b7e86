//! HTTP tests for the /v1 surface, driven through the router in-process.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use dce_api::{create_app, AppState};
use dce_core::{EditorConfig, WorkerConfig};
use dce_render::{RenderOptions, RenderService};
use dce_store::{KeyValueStore, MemoryStore, StoreError};
use dce_worker::ParseClient;
use serde_json::{json, Value};
use tower::ServiceExt;

fn workspace_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    PathBuf::from(manifest_dir).parent().unwrap().parent().unwrap().to_path_buf()
}

fn renderer() -> RenderService {
    RenderService::new(workspace_root().join("templates"), RenderOptions::default()).unwrap()
}

fn app_with(backend: Box<dyn KeyValueStore>, starter: Option<&str>) -> Router {
    let state = AppState::new(
        ParseClient::spawn(&WorkerConfig::default()),
        renderer(),
        backend,
        starter.map(str::to_string),
    );
    create_app(state)
}

fn app() -> Router {
    app_with(Box::new(MemoryStore::new()), None)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

// =============================================================================
// Parse
// =============================================================================

#[tokio::test]
async fn test_parse_success() {
    let (status, body) = send_json(
        &app(),
        json_request(Method::POST, "/v1/parse", json!({ "dataContractYaml": "id: orders\ninfo:\n  title: Orders\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "json": { "id": "orders", "info": { "title": "Orders" } } }));
}

#[tokio::test]
async fn test_parse_error_is_still_ok_status() {
    let (status, body) = send_json(
        &app(),
        json_request(Method::POST, "/v1/parse", json!({ "dataContractYaml": "models: [orders" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["name"], "YAMLException");
    assert!(body.get("requestId").is_none());
}

// =============================================================================
// Render
// =============================================================================

#[tokio::test]
async fn test_render_returns_html() {
    let (status, body) = send(
        &app(),
        json_request(Method::POST, "/v1/render", json!({ "dataContractYaml": "name: orders\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("orders"));
}

#[tokio::test]
async fn test_render_malformed_yaml_is_unprocessable() {
    let (status, body) = send(
        &app(),
        json_request(Method::POST, "/v1/render", json!({ "dataContractYaml": "a: b: c" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let outcome: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(outcome["status"], "error");
}

#[tokio::test]
async fn test_render_template_failure_is_server_error() {
    let broken = RenderService::from_sources([("datacontract.html", "{{render_partial \"partials/absent\" this}}")]).unwrap();
    let state = AppState::new(
        ParseClient::spawn(&WorkerConfig::default()),
        broken,
        Box::new(MemoryStore::new()),
        None,
    );
    let (status, body) = send_json(
        &create_app(state),
        json_request(Method::POST, "/v1/render", json!({ "dataContractYaml": "id: x" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "TEMPLATE");
}

#[tokio::test]
async fn test_render_bad_contract_value_is_unprocessable() {
    let counting = RenderService::from_sources([(
        "datacontract.html",
        "{{#each (range 0 datacontract.count)}}{{this}}{{/each}}",
    )])
    .unwrap();
    let state = AppState::new(
        ParseClient::spawn(&WorkerConfig::default()),
        counting,
        Box::new(MemoryStore::new()),
        None,
    );
    let (status, body) = send_json(
        &create_app(state),
        json_request(Method::POST, "/v1/render", json!({ "dataContractYaml": "count: three" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CONTRACT");
}

// =============================================================================
// Contract persistence
// =============================================================================

#[tokio::test]
async fn test_first_load_then_store_then_load() {
    let app = app();

    let (status, body) = send_json(&app, get("/v1/contract")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstLoad"], true);
    assert!(body["dataContractYaml"].is_null());
    assert!(body["dataContractYamlUpdated"].is_null());

    let (status, stored) = send_json(
        &app,
        json_request(Method::PUT, "/v1/contract", json!({ "dataContractYaml": "id: saved\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = stored["dataContractYamlUpdated"].as_str().unwrap().to_string();
    assert!(updated.ends_with('Z'));

    let (_, body) = send_json(&app, get("/v1/contract")).await;
    assert_eq!(body["firstLoad"], false);
    assert_eq!(body["dataContractYaml"], "id: saved\n");
    assert_eq!(body["dataContractYamlUpdated"], updated);
}

#[tokio::test]
async fn test_starter_contract_offered_only_on_first_load() {
    let app = app_with(Box::new(MemoryStore::new()), Some("id: starter\n"));

    let (_, body) = send_json(&app, get("/v1/contract")).await;
    assert_eq!(body["firstLoad"], true);
    assert_eq!(body["dataContractYaml"], "id: starter\n");

    send(&app, json_request(Method::PUT, "/v1/contract", json!({ "dataContractYaml": "id: mine\n" }))).await;
    let (_, body) = send_json(&app, get("/v1/contract")).await;
    assert_eq!(body["dataContractYaml"], "id: mine\n");
}

/// Refuses writes, as a full or disabled store would
struct ReadOnly;

impl KeyValueStore for ReadOnly {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set_all(&self, _entries: &[(&str, &str)]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_storage_failure_does_not_block_parsing() {
    let app = app_with(Box::new(ReadOnly), None);

    let (status, body) = send_json(
        &app,
        json_request(Method::PUT, "/v1/contract", json!({ "dataContractYaml": "id: x" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORAGE");
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));

    let (status, body) = send_json(
        &app,
        json_request(Method::POST, "/v1/parse", json!({ "dataContractYaml": "id: x" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

/// Memory store whose reads stall the calling thread, like a slow disk
struct SlowDisk(MemoryStore);

impl KeyValueStore for SlowDisk {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        std::thread::sleep(Duration::from_millis(400));
        self.0.get(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        self.0.set_all(entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key)
    }
}

#[tokio::test]
async fn test_slow_store_does_not_stall_other_requests() {
    let app = app_with(Box::new(SlowDisk(MemoryStore::new())), None);

    let started = Instant::now();
    let load = tokio::spawn({
        let app = app.clone();
        async move { send_json(&app, get("/v1/contract")).await }
    });
    // let the load request reach the store before asking for health
    tokio::task::yield_now().await;

    let (status, _) = send_json(&app, get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() < Duration::from_millis(300));

    let (status, body) = load.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstLoad"], true);
}

// =============================================================================
// Assembly
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send_json(&app(), get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_state_from_config_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig {
        templates_dir: workspace_root().join("templates"),
        store_path: Some(dir.path().join("state/editor.json")),
        starter_contract: Some(workspace_root().join("contracts/starter.datacontract.yaml")),
        ..EditorConfig::default()
    };
    let app = create_app(AppState::from_config(&config).unwrap());

    let (_, body) = send_json(&app, get("/v1/contract")).await;
    assert_eq!(body["firstLoad"], true);
    assert!(body["dataContractYaml"].as_str().unwrap().contains("orders-latest"));

    send(&app, json_request(Method::PUT, "/v1/contract", json!({ "dataContractYaml": "id: on-disk\n" }))).await;
    assert!(dir.path().join("state/editor.json").exists());
}

#[tokio::test]
async fn test_state_from_config_rejects_missing_templates() {
    let config = EditorConfig {
        templates_dir: workspace_root().join("missing-templates"),
        ..EditorConfig::default()
    };
    let err = AppState::from_config(&config).err().unwrap();
    assert_eq!(err.code(), "TEMPLATE");
}
