//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

use crate::error::TimerError;
use crate::store::{PersistedState, Store, Task, TaskBoard};
use crate::timer::{AlarmCue, DurationRegistry, Mode, TimerController, TimerSnapshot};

/// Application state shared by the HTTP handlers and background tasks.
///
/// One timer per process. Every mutation is a short synchronous critical
/// section; snapshots are published on a watch channel and completions on
/// a broadcast channel, mirroring how the UI re-renders from state deltas.
#[derive(Debug)]
pub struct AppState {
    timer: Mutex<TimerController>,
    task_board: Mutex<TaskBoard>,
    store: Store,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Channel for timer snapshot updates
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
    /// Channel for countdown completions (consumed by the alarm notifier)
    pub alarm_tx: broadcast::Sender<AlarmCue>,
}

impl AppState {
    /// Build the state from the durable store, falling back to defaults
    /// where the document is missing fields or holds an unknown mode tag.
    pub fn new(port: u16, host: String, store: Store) -> Self {
        let persisted = store.load();
        let durations = DurationRegistry::new(
            persisted.focus_time,
            persisted.short_break_time,
            persisted.long_break_time,
        );
        let active_mode = Mode::from_tag(persisted.active_tag).unwrap_or_else(|e| {
            warn!("Ignoring persisted mode: {}", e);
            Mode::Focus
        });
        let timer = TimerController::new(durations, active_mode, persisted.completed_sessions);
        let task_board = TaskBoard::from_tasks(persisted.tasks);

        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());
        let (alarm_tx, _) = broadcast::channel(16);

        info!(
            "State restored: mode={}, {} completed sessions, {} tasks",
            active_mode.label(),
            timer.completed_sessions(),
            task_board.tasks().len()
        );

        Self {
            timer: Mutex::new(timer),
            task_board: Mutex::new(task_board),
            store,
            start_time: Instant::now(),
            port,
            host,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            alarm_tx,
        }
    }

    /// Start (or resume) the countdown.
    pub fn start(&self, now: DateTime<Utc>) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("start", |timer| timer.start(now))
    }

    /// Pause the running countdown.
    pub fn pause(&self, now: DateTime<Utc>) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("pause", |timer| timer.pause(now))
    }

    /// Reset the countdown to the active mode's configured duration.
    pub fn reset(&self) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("reset", |timer| {
            timer.reset();
            Ok(())
        })
    }

    /// Switch the active mode, subject to the focus-session lock.
    pub fn switch_mode(&self, target: Mode) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("switch-mode", |timer| timer.switch_mode(target))
    }

    /// Dismiss a pending alarm and run session accounting.
    pub fn dismiss_alarm(&self) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("dismiss-alarm", |timer| timer.dismiss_alarm())
    }

    /// Zero the completed-session counter.
    pub fn reset_session_counter(&self) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("reset-sessions", |timer| {
            timer.reset_session_counter();
            Ok(())
        })
    }

    /// Apply new durations (clamped) and the auto-switch flag.
    pub fn update_settings(
        &self,
        focus_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        auto_switch: bool,
    ) -> Result<TimerSnapshot, TimerError> {
        self.with_timer("update-settings", |timer| {
            timer.update_settings(focus_secs, short_break_secs, long_break_secs, auto_switch);
            Ok(())
        })
    }

    /// Re-derive remaining time from the wall clock; called by the 1 Hz
    /// tick task. On the completion edge the cue is broadcast to the
    /// alarm notifier and the persisted document is untouched (session
    /// accounting happens at dismissal, not completion).
    pub fn reconcile(&self, now: DateTime<Utc>) -> Option<AlarmCue> {
        let mut timer = self.lock_timer();
        let cue = timer.reconcile(now);
        let snapshot = timer.snapshot();
        drop(timer);

        if snapshot.running || cue.is_some() {
            let _ = self.snapshot_tx.send(snapshot);
        }
        if let Some(cue) = cue {
            // No receiver is fine; the notifier is advisory only.
            if self.alarm_tx.send(cue).is_err() {
                warn!("No alarm listeners registered for {:?}", cue);
            }
        }
        cue
    }

    /// Get the current timer snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock_timer().snapshot()
    }

    /// Get the current task list.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock_tasks().tasks().to_vec()
    }

    /// Append a task; blank text is rejected.
    pub fn add_task(&self, text: &str) -> Result<Task, TimerError> {
        let task = self.lock_tasks().add(text)?;
        self.persist();
        Ok(task)
    }

    /// Flip the done flag of a task.
    pub fn toggle_task(&self, id: i64) -> Result<Task, TimerError> {
        let task = self.lock_tasks().toggle(id)?;
        self.persist();
        Ok(task)
    }

    /// Delete a task.
    pub fn remove_task(&self, id: i64) -> Result<Task, TimerError> {
        let task = self.lock_tasks().remove(id)?;
        self.persist();
        Ok(task)
    }

    /// Write the durable document out, logging (never raising) failures.
    pub fn persist(&self) {
        let document = self.document();
        if let Err(e) = self.store.save(&document) {
            error!("Failed to persist state to {}: {}", self.store.path().display(), e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Run a timer command, then persist if a durable key changed and
    /// publish the fresh snapshot.
    fn with_timer<T>(
        &self,
        action: &str,
        f: impl FnOnce(&mut TimerController) -> Result<T, TimerError>,
    ) -> Result<TimerSnapshot, TimerError> {
        let mut timer = self.lock_timer();
        let before = durable_view(&timer);
        f(&mut timer)?;
        let changed = durable_view(&timer) != before;
        let snapshot = timer.snapshot();
        drop(timer);

        info!("Timer command applied: {}", action);
        if changed {
            self.persist();
        }
        let _ = self.snapshot_tx.send(snapshot.clone());
        Ok(snapshot)
    }

    /// Assemble the durable document from the live state.
    fn document(&self) -> PersistedState {
        let timer = self.lock_timer();
        let durations = *timer.durations();
        let active_tag = timer.active_mode().tag();
        let completed_sessions = timer.completed_sessions();
        drop(timer);
        let tasks = self.lock_tasks().tasks().to_vec();

        PersistedState {
            focus_time: durations.get(Mode::Focus),
            short_break_time: durations.get(Mode::ShortBreak),
            long_break_time: durations.get(Mode::LongBreak),
            active_tag,
            completed_sessions,
            tasks,
        }
    }

    fn lock_timer(&self) -> MutexGuard<'_, TimerController> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_tasks(&self) -> MutexGuard<'_, TaskBoard> {
        self.task_board.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The durable keys a timer command can touch, for change detection.
fn durable_view(timer: &TimerController) -> (DurationRegistry, u8, u64) {
    (
        *timer.durations(),
        timer.active_mode().tag(),
        timer.completed_sessions(),
    )
}
