//! Flow Zone - A state-managed Pomodoro timer server
//!
//! This is the main entry point for the flow-zone application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use flow_zone::{
    api::create_router,
    config::Config,
    state::AppState,
    store::Store,
    tasks::{alarm_notifier_task, reconcile_tick_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("flow_zone={},tower_http=info", config.log_level()))
        .init();

    info!("Starting flow-zone server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, state_file={}",
        config.host,
        config.port,
        config.state_path().display()
    );

    // Create application state from the persisted document
    let store = Store::new(config.state_path());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store));

    // Start the reconcile tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        reconcile_tick_task(tick_state).await;
    });

    // Start the alarm notifier background task
    let notifier_state = Arc::clone(&state);
    tokio::spawn(async move {
        alarm_notifier_task(notifier_state).await;
    });

    // Create HTTP router with all endpoints and the static front-end
    let app = create_router(Arc::clone(&state), &config.static_dir);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start     - Start or resume the countdown");
    info!("  POST /timer/pause     - Pause the countdown");
    info!("  POST /timer/reset     - Reset the countdown");
    info!("  POST /timer/mode      - Switch focus/break mode");
    info!("  POST /timer/dismiss   - Dismiss a pending alarm");
    info!("  POST /sessions/reset  - Reset the session counter");
    info!("  POST /settings        - Update durations and auto-switch");
    info!("  GET  /status          - Timer snapshot, clock, and tasks");
    info!("  GET  /health          - Health check");
    info!("  *    /tasks...        - Task list CRUD");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // One final save so a stop between mutations never loses state.
    state.persist();
    info!("Server shutdown complete");
    Ok(())
}
