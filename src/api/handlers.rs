//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::api::responses::{
    error_response, CommandResponse, ErrorResponse, HealthResponse, StatusResponse, TaskResponse,
};
use crate::state::AppState;
use crate::store::Task;
use crate::timer::{countdown::format_clock, Mode};

type CommandResult = Result<Json<CommandResponse>, (StatusCode, Json<ErrorResponse>)>;
type TaskResult = Result<Json<TaskResponse>, (StatusCode, Json<ErrorResponse>)>;

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    let snapshot = state.start(Utc::now()).map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Countdown started", snapshot)))
}

/// Handle POST /timer/pause - Freeze the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    let snapshot = state.pause(Utc::now()).map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Countdown paused", snapshot)))
}

/// Handle POST /timer/reset - Reload the active mode's duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    let snapshot = state.reset().map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Countdown reset", snapshot)))
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

/// Handle POST /timer/mode - Switch the active mode
pub async fn switch_mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> CommandResult {
    let snapshot = state.switch_mode(request.mode).map_err(error_response)?;
    Ok(Json(CommandResponse::ok(
        format!("Switched to {}", request.mode.label()),
        snapshot,
    )))
}

/// Handle POST /timer/dismiss - Dismiss a pending alarm
pub async fn dismiss_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    let snapshot = state.dismiss_alarm().map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Alarm dismissed", snapshot)))
}

/// Handle POST /sessions/reset - Zero the completed-session counter
pub async fn reset_sessions_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    let snapshot = state.reset_session_counter().map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Session counter reset", snapshot)))
}

/// Settings payload; durations in seconds, clamped to one minute.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub focus: u64,
    pub short: u64,
    pub long: u64,
    #[serde(default = "default_auto_switch", alias = "autoSwitch")]
    pub auto_switch: bool,
}

fn default_auto_switch() -> bool {
    true
}

/// Handle POST /settings - Apply new durations and the auto-switch flag
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> CommandResult {
    let snapshot = state
        .update_settings(request.focus, request.short, request.long, request.auto_switch)
        .map_err(error_response)?;
    Ok(Json(CommandResponse::ok("Settings updated", snapshot)))
}

/// Handle GET /status - Full state for the polling page
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.snapshot();
    let clock = format_clock(timer.remaining_seconds);
    Json(StatusResponse {
        clock,
        timer,
        tasks: state.tasks(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /tasks - List tasks
pub async fn list_tasks_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.tasks())
}

#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    pub text: String,
}

/// Handle POST /tasks - Add a task
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTaskRequest>,
) -> TaskResult {
    let task = state.add_task(&request.text).map_err(error_response)?;
    info!("Task created via API: id={}", task.id);
    Ok(Json(TaskResponse::ok(task)))
}

/// Handle POST /tasks/:id/toggle - Toggle a task's done flag
pub async fn toggle_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> TaskResult {
    let task = state.toggle_task(id).map_err(error_response)?;
    Ok(Json(TaskResponse::ok(task)))
}

/// Handle DELETE /tasks/:id - Delete a task
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> TaskResult {
    let task = state.remove_task(id).map_err(error_response)?;
    Ok(Json(TaskResponse::ok(task)))
}
