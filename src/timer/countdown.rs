//! Wall-clock countdown engine
//!
//! The countdown never accumulates ticks. While running it stores an
//! absolute target end timestamp and re-derives the remaining seconds from
//! the clock on every reconcile, so a reconcile after minutes of missed
//! scheduling lands on the same value as one called every second.

use chrono::{DateTime, Duration, Utc};

use crate::error::TimerError;

/// Emitted exactly once per countdown, on the running-to-zero edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completed;

/// A frozen or running number of remaining seconds.
///
/// Invariant: `target_end` is `Some` exactly while `running` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_seconds: u64,
    initial_seconds: u64,
    running: bool,
    target_end: Option<DateTime<Utc>>,
}

impl Countdown {
    /// Create a stopped countdown loaded with `initial_seconds`.
    pub fn new(initial_seconds: u64) -> Self {
        Self {
            remaining_seconds: initial_seconds,
            initial_seconds,
            running: false,
            target_end: None,
        }
    }

    /// Start counting down from the current remaining value.
    ///
    /// Fails if the countdown is already running. Starting with zero
    /// seconds remaining is allowed; the next reconcile completes it
    /// immediately.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::InvalidState("countdown is already running"));
        }
        self.target_end = Some(now + Duration::seconds(self.remaining_seconds as i64));
        self.running = true;
        Ok(())
    }

    /// Freeze the countdown at its current reconciled value.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        let target = match self.target_end {
            Some(target) if self.running => target,
            _ => return Err(TimerError::InvalidState("countdown is not running")),
        };
        self.remaining_seconds = derive_remaining(target, now);
        self.target_end = None;
        self.running = false;
        Ok(())
    }

    /// Unconditionally stop and reload with `initial_seconds`.
    pub fn reset(&mut self, initial_seconds: u64) {
        self.remaining_seconds = initial_seconds;
        self.initial_seconds = initial_seconds;
        self.running = false;
        self.target_end = None;
    }

    /// Re-derive the remaining seconds from the wall clock.
    ///
    /// Safe to call after an arbitrary real-time gap: the result only
    /// depends on `now` versus the target timestamp, never on how many
    /// ticks were missed in between. Returns the completion marker exactly
    /// once, on the transition to zero; further calls are no-ops until the
    /// countdown is started again.
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> Option<Completed> {
        let target = match self.target_end {
            Some(target) if self.running => target,
            _ => return None,
        };
        self.remaining_seconds = derive_remaining(target, now);
        if self.remaining_seconds == 0 {
            self.running = false;
            self.target_end = None;
            return Some(Completed);
        }
        None
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn initial_seconds(&self) -> u64 {
        self.initial_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fraction of the countdown still remaining, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.initial_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / self.initial_seconds as f64
    }
}

/// `max(0, ceil((target - now) / 1s))`, matching what a per-second display
/// shows: a countdown with 900ms left still reads "1".
fn derive_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (target - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 999) / 1000) as u64
    }
}

/// Format seconds as "MM:SS" for display.
pub fn format_clock(seconds: u64) -> String {
    let m = seconds / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}", m, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn ts_millis(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + millis).unwrap()
    }

    #[test]
    fn test_reset_then_reconcile_is_identity() {
        let mut cd = Countdown::new(300);
        cd.reset(1500);
        assert_eq!(cd.reconcile(ts(0)), None);
        assert_eq!(cd.remaining_seconds(), 1500);
        assert!(!cd.is_running());
    }

    #[test]
    fn test_remaining_tracks_wall_clock() {
        let mut cd = Countdown::new(10);
        cd.start(ts(0)).unwrap();
        assert_eq!(cd.reconcile(ts(0)), None);
        assert_eq!(cd.remaining_seconds(), 10);

        assert_eq!(cd.reconcile(ts(4)), None);
        assert_eq!(cd.remaining_seconds(), 6);

        // Sub-second remainders round up, like a per-second display.
        assert_eq!(cd.reconcile(ts_millis(9_100)), None);
        assert_eq!(cd.remaining_seconds(), 1);
    }

    #[test]
    fn test_remaining_is_monotonically_non_increasing() {
        let mut cd = Countdown::new(60);
        cd.start(ts(0)).unwrap();
        let mut last = u64::MAX;
        for k in 0..=60 {
            cd.reconcile(ts(k));
            assert!(cd.remaining_seconds() <= last);
            last = cd.remaining_seconds();
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut cd = Countdown::new(10);
        cd.start(ts(0)).unwrap();
        assert_eq!(cd.reconcile(ts(10)), Some(Completed));
        assert!(!cd.is_running());
        assert_eq!(cd.remaining_seconds(), 0);

        // Reconciling again at the same (or any later) instant is a no-op.
        assert_eq!(cd.reconcile(ts(10)), None);
        assert_eq!(cd.reconcile(ts(9_999)), None);
    }

    #[test]
    fn test_reconcile_is_idempotent_at_same_instant() {
        let mut cd = Countdown::new(100);
        cd.start(ts(0)).unwrap();
        cd.reconcile(ts(30));
        let snapshot = cd.clone();
        cd.reconcile(ts(30));
        assert_eq!(cd, snapshot);
    }

    #[test]
    fn test_survives_long_suspension_gap() {
        // start(25min), then the host is not scheduled for 40 minutes:
        // one reconcile yields zero and a single completion signal.
        let mut cd = Countdown::new(25 * 60);
        cd.start(ts(0)).unwrap();
        assert_eq!(cd.reconcile(ts(0)), None);
        assert_eq!(cd.reconcile(ts(2400)), Some(Completed));
        assert_eq!(cd.remaining_seconds(), 0);
        assert_eq!(cd.reconcile(ts(2401)), None);
    }

    #[test]
    fn test_pause_freezes_reconciled_value() {
        let mut cd = Countdown::new(600);
        cd.start(ts(0)).unwrap();
        cd.pause(ts(45)).unwrap();
        assert_eq!(cd.remaining_seconds(), 555);
        assert!(!cd.is_running());

        // Paused time does not advance.
        assert_eq!(cd.reconcile(ts(500)), None);
        assert_eq!(cd.remaining_seconds(), 555);

        // Resuming counts down from the frozen value.
        cd.start(ts(1000)).unwrap();
        assert_eq!(cd.reconcile(ts(1005)), None);
        assert_eq!(cd.remaining_seconds(), 550);
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut cd = Countdown::new(60);
        cd.start(ts(0)).unwrap();
        assert_eq!(
            cd.start(ts(1)),
            Err(TimerError::InvalidState("countdown is already running"))
        );
    }

    #[test]
    fn test_pause_while_stopped_is_rejected() {
        let mut cd = Countdown::new(60);
        assert_eq!(
            cd.pause(ts(0)),
            Err(TimerError::InvalidState("countdown is not running"))
        );
    }

    #[test]
    fn test_reset_while_running_stops() {
        let mut cd = Countdown::new(60);
        cd.start(ts(0)).unwrap();
        cd.reconcile(ts(10));
        cd.reset(300);
        assert!(!cd.is_running());
        assert_eq!(cd.remaining_seconds(), 300);
        assert_eq!(cd.initial_seconds(), 300);
        assert_eq!(cd.reconcile(ts(20)), None);
    }

    #[test]
    fn test_progress_fraction() {
        let mut cd = Countdown::new(100);
        cd.start(ts(0)).unwrap();
        cd.reconcile(ts(25));
        assert!((cd.progress() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(600), "10:00");
    }
}
