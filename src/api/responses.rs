//! API response structures

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::TimerError;
use crate::store::Task;
use crate::timer::TimerSnapshot;

/// Envelope for command endpoints: what happened plus the fresh timer
/// snapshot to re-render from.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Error envelope; the `kind` mirrors the domain error variants so the
/// page can decide between the transient lock toast and the inline
/// validation message.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Map a domain error to its HTTP representation.
pub fn error_response(err: TimerError) -> (StatusCode, Json<ErrorResponse>) {
    let (code, kind) = match &err {
        TimerError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
        TimerError::Locked => (StatusCode::LOCKED, "locked"),
        TimerError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
    };
    let body = ErrorResponse {
        status: "error".to_string(),
        kind: kind.to_string(),
        message: err.to_string(),
        timestamp: Utc::now(),
    };
    (code, Json(body))
}

/// Full status for the polling presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    /// Remaining time rendered as "MM:SS".
    pub clock: String,
    pub tasks: Vec<Task>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Response for task mutations.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub status: String,
    pub task: Task,
    pub timestamp: DateTime<Utc>,
}

impl TaskResponse {
    pub fn ok(task: Task) -> Self {
        Self {
            status: "ok".to_string(),
            task,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
