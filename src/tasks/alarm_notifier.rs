//! Alarm notifier background task

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::services::send_completion_notification;
use crate::state::AppState;

/// Background task that raises a desktop notification for each countdown
/// completion.
///
/// Advisory only: the alarm still rings in the page via the status
/// snapshot whether or not the notification goes out, and failures are
/// swallowed after logging.
pub async fn alarm_notifier_task(state: Arc<AppState>) {
    info!("Starting alarm notifier task");

    let mut alarm_rx = state.alarm_tx.subscribe();

    loop {
        match alarm_rx.recv().await {
            Ok(cue) => {
                if let Err(e) = send_completion_notification(cue).await {
                    warn!("Completion notification failed (alarm unaffected): {}", e);
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Alarm notifier lagged, skipped {} completions", missed);
            }
            Err(RecvError::Closed) => {
                info!("Alarm channel closed, notifier exiting");
                break;
            }
        }
    }
}
