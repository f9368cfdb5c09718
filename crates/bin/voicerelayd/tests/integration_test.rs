//! End-to-end smoke tests for the full voicerelayd stack.
//!
//! Each test spins up the complete application (JSON store in a temp
//! directory, real services, real axum router) and exercises the HTTP
//! layer via `tower::ServiceExt::oneshot` — no TCP port is bound and no
//! broker is contacted: publishes are captured by a recording publisher.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use voicerelay_adapter_http_axum::router;
use voicerelay_adapter_http_axum::state::AppState;
use voicerelay_adapter_mqtt::MqttService;
use voicerelay_adapter_storage_json::JsonConfigStore;
use voicerelay_app::ports::ControlPublisher;
use voicerelay_app::services::config_service::ConfigService;
use voicerelay_app::services::dispatch_service::DispatchService;
use voicerelay_app::services::liveness::LivenessTracker;
use voicerelay_app::store::SharedStore;
use voicerelay_domain::error::VoiceRelayError;

#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, serde_json::Value)>>,
}

impl ControlPublisher for RecordingPublisher {
    fn publish(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), VoiceRelayError>> + Send {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        async move { Ok(()) }
    }
}

struct TestStack {
    app: axum::Router,
    mqtt: MqttService<JsonConfigStore, Arc<RecordingPublisher>>,
    publisher: Arc<RecordingPublisher>,
}

/// Build a fully-wired stack backed by a JSON store at `path`.
fn stack(path: &Path) -> TestStack {
    let store = SharedStore::new(JsonConfigStore::new(path));
    let publisher = Arc::new(RecordingPublisher::default());
    let tracker = Arc::new(LivenessTracker::new(store.clone()));

    let state = AppState::new(
        Arc::new(ConfigService::new(store.clone())),
        Arc::new(DispatchService::new(
            store.clone(),
            Arc::clone(&publisher),
        )),
        Arc::clone(&tracker),
    );
    let mqtt = MqttService::new(
        ConfigService::new(store),
        tracker,
        Arc::clone(&publisher),
    );

    TestStack {
        app: router::build(state),
        mqtt,
        publisher,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_payload() -> serde_json::Value {
    serde_json::json!({
        "description": "meeting room light",
        "object_name": "lampu ruang meeting",
        "device_name": "relay satu",
        "part_number": "RELAYMINI",
        "pin": 2,
        "address": 32,
        "device_bus": 1,
        "mac": "AA:BB:CC:DD:EE:01",
    })
}

async fn post_json(app: &axum::Router, uri: &str, payload: &serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    let resp = get(&stack.app, "/health").await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_dispatch_control_message_for_created_record() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    let resp = post_json(&stack.app, "/api/configurations", &create_payload()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let payload = serde_json::json!({ "text": "nyalakan lampu ruang meeting" });
    let resp = post_json(&stack.app, "/api/voice/test", &payload).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let published = stack.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (topic, message) = &published[0];
    assert_eq!(topic, "modular");
    assert_eq!(message["mac"], "AA:BB:CC:DD:EE:01");
    assert_eq!(message["protocol_type"], "Modular");
    assert_eq!(message["device"], "RELAYMINI");
    assert_eq!(message["function"], "write");
    assert_eq!(message["value"]["pin"], 2);
    assert_eq!(message["value"]["data"], 1);
    assert_eq!(message["address"], 32);
    assert_eq!(message["device_bus"], 1);
}

#[tokio::test]
async fn should_reject_phrase_matching_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    post_json(&stack.app, "/api/configurations", &create_payload()).await;

    let payload = serde_json::json!({ "text": "matikan lampu dapur" });
    let resp = post_json(&stack.app, "/api/voice/test", &payload).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(stack.publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_persist_records_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let first = stack(&path);
    let resp = post_json(&first.app, "/api/configurations", &create_payload()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    drop(first);

    let second = stack(&path);
    let resp = get(&second.app, "/api/configurations").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["object_name"], "lampu ruang meeting");
}

#[tokio::test]
async fn should_expose_heartbeat_status_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    post_json(&stack.app, "/api/configurations", &create_payload()).await;

    // Inbound heartbeat arrives over the broker side of the stack.
    stack
        .mqtt
        .handle(
            "device/heartbeat/AA:BB:CC:DD:EE:01",
            serde_json::json!({ "timestamp": "2024-05-01T10:00:00+00:00" })
                .to_string()
                .as_bytes(),
        )
        .await;

    let resp = get(&stack.app, "/api/devices/status/AA:BB:CC:DD:EE:01").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["last_seen"], "2024-05-01T10:00:00+00:00");
}

#[tokio::test]
async fn should_create_record_from_mqtt_command_and_list_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    stack
        .mqtt
        .handle(
            "command/voicerelay/create",
            create_payload().to_string().as_bytes(),
        )
        .await;

    let published = stack.publisher.published.lock().unwrap();
    let (topic, response) = &published[0];
    assert_eq!(topic, "response/voicerelay/result");
    assert_eq!(response["status"], "success");
    drop(published);

    let resp = get(&stack.app, "/api/configurations").await;
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_announced_unit_before_it_is_configured() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    stack
        .mqtt
        .handle("device/announce/BB:CC:DD:EE:FF:01", b"{}")
        .await;

    let resp = get(&stack.app, "/api/devices/available").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["mac"], "BB:CC:DD:EE:FF:01");
    assert_eq!(body[0]["status"], "online");
}

#[tokio::test]
async fn should_broadcast_discovery_request() {
    let dir = tempfile::tempdir().unwrap();
    let stack = stack(&dir.path().join("records.json"));

    let resp = post_json(&stack.app, "/api/devices/discover", &serde_json::json!({})).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let published = stack.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (topic, message) = &published[0];
    assert_eq!(topic, "device/discovery");
    assert_eq!(message["request"], "all");
}
