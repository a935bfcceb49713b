//! End-to-end tests driving the HTTP router

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use flow_zone::{api::create_router, state::AppState, store::Store};

/// Router backed by a throwaway state file. The TempDir must outlive the
/// requests, so it is returned alongside the app.
fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("state.json"));
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), store));
    let app = create_router(state, &dir.path().join("dist"));
    (app, dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _dir) = test_app();
    let response = send(&app, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_starts_from_defaults() {
    let (app, _dir) = test_app();
    let response = send(&app, "GET", "/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["timer"]["mode"], "focus");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
    assert_eq!(body["timer"]["completed_sessions"], 0);
    assert_eq!(body["timer"]["cycle_number"], 1);
    assert_eq!(body["timer"]["auto_switch_enabled"], true);
    assert_eq!(body["clock"], "25:00");
    assert_eq!(body["tasks"], json!([]));
}

#[tokio::test]
async fn start_locks_focus_mode_switches() {
    let (app, _dir) = test_app();

    let response = send(&app, "POST", "/timer/start", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["timer"]["running"], true);
    assert_eq!(body["timer"]["focus_session_active"], true);

    // Switching away from a live focus session is refused with the
    // transient lock message.
    let response = send(&app, "POST", "/timer/mode", Some(json!({"mode": "short_break"}))).await;
    assert_eq!(response.status(), StatusCode::LOCKED);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "locked");
    assert_eq!(body["message"], "Complete or reset your focus session first");
}

#[tokio::test]
async fn pause_requires_a_running_countdown() {
    let (app, _dir) = test_app();
    let response = send(&app, "POST", "/timer/pause", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn dismiss_without_pending_alarm_conflicts() {
    let (app, _dir) = test_app();
    let response = send(&app, "POST", "/timer/dismiss", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn mode_switch_reloads_duration_when_unlocked() {
    let (app, _dir) = test_app();
    let response = send(&app, "POST", "/timer/mode", Some(json!({"mode": "long_break"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["timer"]["mode"], "long_break");
    assert_eq!(body["timer"]["remaining_seconds"], 600);
    assert_eq!(body["timer"]["running"], false);
}

#[tokio::test]
async fn settings_clamp_durations_to_one_minute() {
    let (app, _dir) = test_app();
    let response = send(
        &app,
        "POST",
        "/settings",
        Some(json!({"focus": 0, "short": 300, "long": 600, "auto_switch": false})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["timer"]["durations"]["focus_secs"], 60);
    assert_eq!(body["timer"]["remaining_seconds"], 60);
    assert_eq!(body["timer"]["auto_switch_enabled"], false);
}

#[tokio::test]
async fn session_counter_resets_unconditionally() {
    let (app, _dir) = test_app();
    let response = send(&app, "POST", "/sessions/reset", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["timer"]["completed_sessions"], 0);
}

#[tokio::test]
async fn task_crud_round_trip() {
    let (app, _dir) = test_app();

    // Blank text is rejected with the inline validation message.
    let response = send(&app, "POST", "/tasks", Some(json!({"text": "   "}))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "validation");

    let response = send(&app, "POST", "/tasks", Some(json!({"text": "write tests"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id = body["task"]["id"].as_i64().unwrap();
    assert_eq!(body["task"]["done"], false);

    let response = send(&app, "POST", &format!("/tasks/{}/toggle", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["task"]["done"], true);

    let response = send(&app, "GET", "/tasks", None).await;
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = send(&app, "DELETE", &format!("/tasks/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/tasks", None).await;
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn toggling_an_unknown_task_is_a_validation_error() {
    let (app, _dir) = test_app();
    let response = send(&app, "POST", "/tasks/99/toggle", None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_paths_fall_through_to_static_assets() {
    let (app, _dir) = test_app();
    // No built assets in the test fixture, so the fallback 404s rather
    // than hitting an API route.
    let response = send(&app, "GET", "/some/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
