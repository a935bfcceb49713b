//! Timer controller
//!
//! Single owner of the countdown engine, duration registry, session state,
//! and alarm state. Every user command is an explicit method returning
//! either success or a recoverable [`TimerError`]; the HTTP layer is a thin
//! adapter over these calls and re-renders from the returned snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::TimerError;
use crate::timer::alarm::{AlarmCue, AlarmState};
use crate::timer::countdown::Countdown;
use crate::timer::durations::DurationRegistry;
use crate::timer::session::{Mode, SessionState};

/// Point-in-time view of the whole timer, serialized into every API
/// response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub running: bool,
    pub remaining_seconds: u64,
    pub initial_seconds: u64,
    /// Fraction of the countdown still remaining, in `0.0..=1.0`.
    pub progress: f64,
    pub alarm_pending: bool,
    pub alarm_cue: Option<AlarmCue>,
    pub focus_session_active: bool,
    pub completed_sessions: u64,
    pub cycle_position: u64,
    pub cycle_number: u64,
    pub auto_switch_enabled: bool,
    pub durations: DurationRegistry,
}

#[derive(Debug)]
pub struct TimerController {
    durations: DurationRegistry,
    countdown: Countdown,
    session: SessionState,
    alarm: AlarmState,
}

impl TimerController {
    /// Build a controller from persisted settings. The countdown loads the
    /// active mode's duration; alarm and lock state always start clear.
    pub fn new(durations: DurationRegistry, active_mode: Mode, completed_sessions: u64) -> Self {
        let countdown = Countdown::new(durations.get(active_mode));
        Self {
            durations,
            countdown,
            session: SessionState::new(active_mode, completed_sessions),
            alarm: AlarmState::default(),
        }
    }

    /// Start (or resume) the countdown in the active mode.
    ///
    /// Rejected while an alarm is pending: the previous session must be
    /// dismissed before a new countdown may begin.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        if self.alarm.is_pending() {
            return Err(TimerError::InvalidState("an alarm is pending dismissal"));
        }
        self.countdown.start(now)?;
        if self.session.active_mode == Mode::Focus {
            self.session.focus_session_active = true;
        }
        info!(
            "Countdown started: {} for {}s",
            self.session.active_mode.label(),
            self.countdown.remaining_seconds()
        );
        Ok(())
    }

    /// Freeze the countdown at its current value. Pausing in Focus mode
    /// keeps the focus-session lock held.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        self.countdown.pause(now)?;
        info!(
            "Countdown paused at {}s remaining",
            self.countdown.remaining_seconds()
        );
        Ok(())
    }

    /// Stop the countdown and reload the active mode's configured
    /// duration.
    ///
    /// Resetting while in Focus mode deliberately does NOT release the
    /// focus-session lock; the session must be dismissed or the mode
    /// changed to give it up.
    pub fn reset(&mut self) {
        self.countdown.reset(self.durations.get(self.session.active_mode));
        if self.session.active_mode != Mode::Focus {
            self.session.focus_session_active = false;
        }
        info!("Countdown reset: {}", self.session.active_mode.label());
    }

    /// Switch the active mode and reload its duration. Does not
    /// auto-start.
    pub fn switch_mode(&mut self, target: Mode) -> Result<(), TimerError> {
        if self.session.focus_session_active
            && self.session.active_mode == Mode::Focus
            && target != Mode::Focus
        {
            debug!("Mode switch to {} blocked by focus lock", target.label());
            return Err(TimerError::Locked);
        }
        self.apply_mode(target);
        Ok(())
    }

    /// Re-derive the remaining time from the wall clock, ringing the alarm
    /// on the completion edge. Returns the cue when this call completed
    /// the countdown.
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> Option<AlarmCue> {
        self.countdown.reconcile(now)?;
        let cue = AlarmCue::for_mode(self.session.active_mode);
        self.alarm.ring(cue);
        info!("Countdown complete: {}", self.session.active_mode.label());
        Some(cue)
    }

    /// Dismiss a pending alarm and run session accounting.
    ///
    /// A focus completion increments the session counter whether or not
    /// auto-switch is enabled; only the mode transition is optional. With
    /// auto-switch on, a focus completion routes to a long break every
    /// fourth session and a short break otherwise, and a break completion
    /// routes back to focus. The mode transition here bypasses the lock
    /// check since dismissal is exactly what releases the lock.
    pub fn dismiss_alarm(&mut self) -> Result<(), TimerError> {
        let cue = self
            .alarm
            .dismiss()
            .ok_or(TimerError::InvalidState("no alarm is pending"))?;

        match cue {
            AlarmCue::FocusComplete => {
                self.session.completed_sessions += 1;
                info!(
                    "Focus session complete ({} total, {}/4 in cycle)",
                    self.session.completed_sessions,
                    self.session.cycle_position()
                );
                if self.session.auto_switch_enabled {
                    self.apply_mode(self.session.next_break_mode());
                }
            }
            AlarmCue::BreakComplete => {
                if self.session.auto_switch_enabled {
                    self.apply_mode(Mode::Focus);
                }
            }
        }
        self.session.focus_session_active = false;
        Ok(())
    }

    /// Zero the completed-session counter. Valid in any timer state.
    pub fn reset_session_counter(&mut self) {
        self.session.completed_sessions = 0;
        info!("Session counter reset");
    }

    /// Apply new durations and the auto-switch flag. Each duration is
    /// clamped to the one-minute minimum rather than rejected.
    ///
    /// A running countdown keeps its target timestamp; an idle one (no
    /// pending alarm) reloads the active mode's new duration.
    pub fn update_settings(
        &mut self,
        focus_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        auto_switch: bool,
    ) {
        let focus = self.durations.set(Mode::Focus, focus_secs);
        let short = self.durations.set(Mode::ShortBreak, short_break_secs);
        let long = self.durations.set(Mode::LongBreak, long_break_secs);
        self.session.auto_switch_enabled = auto_switch;
        if !self.countdown.is_running() && !self.alarm.is_pending() {
            self.countdown.reset(self.durations.get(self.session.active_mode));
        }
        info!(
            "Settings updated: focus={}s short={}s long={}s auto_switch={}",
            focus, short, long, auto_switch
        );
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.session.active_mode,
            running: self.countdown.is_running(),
            remaining_seconds: self.countdown.remaining_seconds(),
            initial_seconds: self.countdown.initial_seconds(),
            progress: self.countdown.progress(),
            alarm_pending: self.alarm.is_pending(),
            alarm_cue: self.alarm.cue(),
            focus_session_active: self.session.focus_session_active,
            completed_sessions: self.session.completed_sessions,
            cycle_position: self.session.cycle_position(),
            cycle_number: self.session.cycle_number(),
            auto_switch_enabled: self.session.auto_switch_enabled,
            durations: self.durations,
        }
    }

    pub fn active_mode(&self) -> Mode {
        self.session.active_mode
    }

    pub fn completed_sessions(&self) -> u64 {
        self.session.completed_sessions
    }

    pub fn durations(&self) -> &DurationRegistry {
        &self.durations
    }

    /// Mode change without the lock check; shared by `switch_mode` and the
    /// auto-advance path in `dismiss_alarm`.
    fn apply_mode(&mut self, target: Mode) {
        self.session.active_mode = target;
        self.countdown.reset(self.durations.get(target));
        info!("Active mode: {}", target.label());
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new(DurationRegistry::default(), Mode::Focus, 0)
    }
}
