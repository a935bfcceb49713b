//! HTTP API module
//!
//! Command endpoints for the timer core, task CRUD, status polling, and
//! the static single-page front-end.

pub mod handlers;
pub mod responses;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints.
///
/// Anything that is not an API route falls through to the built
/// single-page assets, with `index.html` served for unknown paths so
/// client-side routing keeps working.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/mode", post(switch_mode_handler))
        .route("/timer/dismiss", post(dismiss_handler))
        .route("/sessions/reset", post(reset_sessions_handler))
        .route("/settings", post(settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/tasks", get(list_tasks_handler).post(add_task_handler))
        .route("/tasks/:id/toggle", post(toggle_task_handler))
        .route("/tasks/:id", delete(delete_task_handler))
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
