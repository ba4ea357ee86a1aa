use super::*;
use crate::config::CoordinatorTimeouts;
use crate::coordinator::{CoordinatorClient, CoordinatorError};
use crate::state::test_helpers::{MockCoordinator, TEST_COORDINATOR_URL, test_app_state};
use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.expect("router should respond");
    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("body should be JSON") };
    (status, json)
}

fn post_diagnose(body: impl Into<Body>) -> Request<Body> {
    Request::post("/api/diagnose")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request should build")
}

fn post_json(body: &Value) -> Request<Body> {
    post_diagnose(body.to_string())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request should build")
}

// =============================================================
// Mocked coordinator
// =============================================================

#[tokio::test]
async fn post_headache_returns_upstream_response() {
    let mock = Arc::new(MockCoordinator::replying(json!({"response": "possible tension headache"})));
    let app = app(test_app_state(mock.clone()));

    let (status, body) = send(app, post_json(&json!({"message": "headache"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "possible tension headache");
    assert_eq!(body["metadata"]["coordinator_url"], TEST_COORDINATOR_URL);
    assert!(body["metadata"]["timestamp"].is_string());
    assert_eq!(mock.calls(), vec!["headache".to_string()]);
}

#[tokio::test]
async fn post_empty_message_is_invalid_input() {
    let mock = Arc::new(MockCoordinator::replying(json!({"response": "unused"})));
    let app = app(test_app_state(mock.clone()));

    let (status, body) = send(app, post_json(&json!({"message": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn post_missing_or_non_string_message_is_invalid_input() {
    for payload in [json!({}), json!({"message": null}), json!({"message": 7}), json!({"text": "hi"}), json!([])] {
        let mock = Arc::new(MockCoordinator::replying(json!({"response": "unused"})));
        let app = app(test_app_state(mock.clone()));

        let (status, body) = send(app, post_json(&payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["error"], "Invalid input");
        assert!(mock.calls().is_empty());
    }
}

#[tokio::test]
async fn post_message_over_two_megabytes_is_forwarded() {
    let mock = Arc::new(MockCoordinator::replying(json!({"response": "received"})));
    let app = app(test_app_state(mock.clone()));
    let message = "a".repeat(3 * 1024 * 1024);

    let (status, body) = send(app, post_json(&json!({"message": message}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "received");
    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 3 * 1024 * 1024);
}

#[tokio::test]
async fn post_malformed_json_is_internal_error() {
    let mock = Arc::new(MockCoordinator::replying(json!({"response": "unused"})));
    let app = app(test_app_state(mock.clone()));

    let (status, body) = send(app, post_diagnose("{not json")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn post_maps_coordinator_timeout_to_504() {
    let mock = Arc::new(MockCoordinator::new(|| Err(CoordinatorError::Timeout)));
    let (status, body) = send(app(test_app_state(mock)), post_json(&json!({"message": "fever"}))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Request timeout");
}

#[tokio::test]
async fn post_handler_panic_is_caught_as_500() {
    let mock = Arc::new(MockCoordinator::new(|| panic!("coordinator mock exploded")));
    let (status, body) = send(app(test_app_state(mock)), post_json(&json!({"message": "fever"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn get_diagnose_is_static_health_check() {
    let mock = Arc::new(MockCoordinator::new(|| Err(CoordinatorError::Timeout)));
    let (status, body) = send(app(test_app_state(mock.clone())), get("/api/diagnose")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "MediChain AI - Diagnostic API");
    assert_eq!(body["coordinator_url"], TEST_COORDINATOR_URL);
    assert!(body["timestamp"].is_string());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn healthz_returns_ok() {
    let mock = Arc::new(MockCoordinator::replying(json!({})));
    let (status, body) = send(app(test_app_state(mock)), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

// =============================================================
// Real client against a local upstream
// =============================================================

fn live_app(base_url: &str, timeouts: CoordinatorTimeouts) -> Router {
    let client = CoordinatorClient::new(base_url, timeouts).expect("client should build");
    app(AppState::new(Arc::new(client), base_url))
}

#[tokio::test]
async fn end_to_end_headache_scenario() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/diagnose")
                .json_body(json!({"message": "headache"}));
            then.status(200).json_body(json!({"response": "possible tension headache"}));
        })
        .await;

    let app = live_app(&server.base_url(), CoordinatorTimeouts::default());
    let (status, body) = send(app, post_json(&json!({"message": "  headache  "}))).await;

    assert_eq!(upstream.hits_async().await, 1);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "possible tension headache");
    assert_eq!(body["metadata"]["coordinator_url"], server.base_url());
}

#[tokio::test]
async fn end_to_end_upstream_status_is_relayed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/diagnose");
            then.status(422).body("patient record rejected: internal detail");
        })
        .await;

    let app = live_app(&server.base_url(), CoordinatorTimeouts::default());
    let (status, body) = send(app, post_json(&json!({"message": "fever"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Diagnostic system error");
    assert!(!body.to_string().contains("internal detail"));
}

#[tokio::test]
async fn end_to_end_slow_upstream_is_504() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/diagnose");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({"response": "too late"}));
        })
        .await;

    let timeouts = CoordinatorTimeouts { request: Duration::from_millis(200), connect: Duration::from_millis(200) };
    let (status, body) = send(live_app(&server.base_url(), timeouts), post_json(&json!({"message": "fever"}))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Request timeout");
}

#[tokio::test]
async fn end_to_end_unreachable_upstream_is_503() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = live_app(&format!("http://{addr}"), CoordinatorTimeouts::default());
    let (status, body) = send(app, post_json(&json!({"message": "fever"}))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service unavailable");
}
