//! Periodic reconcile tick
//!
//! Drives the countdown roughly once per second. The tick is a trigger
//! only: remaining time is always re-derived from the wall clock inside
//! `reconcile`, so a burst of ticks missed while the host was suspended
//! collapses into one reconcile and at most one completion signal.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that reconciles the countdown against the wall clock.
pub async fn reconcile_tick_task(state: Arc<AppState>) {
    info!("Starting reconcile tick task");

    let mut tick = interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tick.tick().await;
        if let Some(cue) = state.reconcile(Utc::now()) {
            debug!("Completion signal delivered: {:?}", cue);
        }
    }
}
